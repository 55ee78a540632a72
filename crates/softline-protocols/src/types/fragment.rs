//! Per-fragment lifecycle.

use serde::{Deserialize, Serialize};

/// Where a candidate text fragment is in its lifecycle.
///
/// `Gated` and every `Resolved` variant are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentState {
    Unseen,
    Gated,
    Pending,
    Resolved(Resolution),
}

impl FragmentState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Gated | Self::Resolved(_))
    }
}

/// Terminal outcome of a claimed fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Wrapped in a revertible element.
    Spliced,
    /// Parent was unusable; the text node itself was rewritten in place.
    TextReplaced,
    /// Backend returned nothing new.
    Unchanged,
    /// Scored under the configured threshold.
    BelowThreshold,
    /// Transform call failed; the DOM was left alone.
    Failed,
    /// Node left the document before the result arrived.
    Dropped,
}

impl Resolution {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Spliced | Self::TextReplaced)
    }
}
