//! Transform results.

use serde::{Deserialize, Serialize};

use super::ServiceKind;

/// Normalized outcome of one rewrite call, whichever backend served it.
///
/// `transformed_text` is present iff `success`; `error` is present iff not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformed_text: Option<String>,
    pub service: ServiceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toxicity_score: Option<f64>,
    pub processing_time_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TransformResult {
    pub fn succeeded(service: ServiceKind, text: impl Into<String>, processing_time_ms: u64) -> Self {
        Self {
            success: true,
            transformed_text: Some(text.into()),
            service,
            toxicity_score: None,
            processing_time_ms,
            error: None,
        }
    }

    pub fn failed(service: ServiceKind, error: impl Into<String>, processing_time_ms: u64) -> Self {
        Self {
            success: false,
            transformed_text: None,
            service,
            toxicity_score: None,
            processing_time_ms,
            error: Some(error.into()),
        }
    }

    pub fn with_toxicity(mut self, score: f64) -> Self {
        self.toxicity_score = Some(score);
        self
    }

    /// The rewritten text, only when the call succeeded.
    pub fn text(&self) -> Option<&str> {
        if self.success {
            self.transformed_text.as_deref()
        } else {
            None
        }
    }
}
