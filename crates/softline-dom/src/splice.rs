//! Text node replacement with a revertible wrapper element.
//!
//! A spliced fragment becomes:
//!
//! ```text
//! <span class="softline-replacement" data-original=".." data-transformed=".."
//!       data-current="transformed" data-service="..">transformed</span>
//! ```
//!
//! The original and rewritten strings are stored raw; [`crate::render`]
//! escapes them on output.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use softline_protocols::{MetricsEvent, MetricsSink, ServiceKind};
use tracing::{debug, trace};

use crate::document::Dom;
use crate::node::NodeId;

pub const WRAPPER_CLASS: &str = "softline-replacement";
pub const WRAPPER_PLAIN_CLASS: &str = "softline-replacement-plain";
pub const ATTR_ORIGINAL: &str = "data-original";
pub const ATTR_TRANSFORMED: &str = "data-transformed";
pub const ATTR_CURRENT: &str = "data-current";
pub const ATTR_HOVERING: &str = "data-hovering";
pub const ATTR_SERVICE: &str = "data-service";

pub const CURRENT_ORIGINAL: &str = "original";
pub const CURRENT_TRANSFORMED: &str = "transformed";

/// Elements whose content is plain text; a wrapper cannot be spliced in.
const RAW_TEXT_TAGS: &[&str] = &["textarea", "title"];

/// Whether `id` is a wrapper produced by [`SpliceEngine::splice`].
pub fn is_wrapper(dom: &Dom, id: NodeId) -> bool {
    dom.has_class(id, WRAPPER_CLASS) || dom.has_class(id, WRAPPER_PLAIN_CLASS)
}

/// Nearest inclusive ancestor of `id` that is a wrapper.
pub fn enclosing_wrapper(dom: &Dom, id: NodeId) -> Option<NodeId> {
    dom.closest(id, is_wrapper)
}

/// Metadata carried alongside a splice into the metrics event.
#[derive(Debug, Clone)]
pub struct SpliceMeta {
    pub service: ServiceKind,
    pub toxicity_score: f64,
    pub prompt_style: String,
    pub processing_time_ms: u64,
    pub show_highlight: bool,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The text node was freed or is no longer in the document.
    NodeDetached,
    /// The handle points at an element.
    NotAText,
    /// The node has no parent.
    ParentMissing,
    ParentNotElement,
    ParentDetached,
    /// The parent only holds raw text (`textarea`, `title`), so markup
    /// cannot go inside it. The text can still be rewritten in place.
    RawTextParent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpliceOutcome {
    Applied { wrapper: NodeId },
    Skipped(SkipReason),
}

impl SpliceOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, SpliceOutcome::Applied { .. })
    }
}

/// Performs splices and owns the replacement counter.
pub struct SpliceEngine {
    sink: Arc<dyn MetricsSink>,
    applied: AtomicU64,
}

impl SpliceEngine {
    pub fn new(sink: Arc<dyn MetricsSink>) -> Self {
        Self {
            sink,
            applied: AtomicU64::new(0),
        }
    }

    /// Number of successful splices since construction.
    pub fn applied_count(&self) -> u64 {
        self.applied.load(Ordering::Relaxed)
    }

    /// Replace the text node `node` with a wrapper showing `transformed`.
    ///
    /// Preconditions are checked before any write; a skipped splice leaves
    /// the document untouched and emits no metrics event.
    pub fn splice(
        &self,
        dom: &mut Dom,
        node: NodeId,
        original: &str,
        transformed: &str,
        meta: &SpliceMeta,
    ) -> SpliceOutcome {
        let parent = match check_target(dom, node) {
            Ok(parent) => parent,
            Err(reason) => {
                debug!(node = %node, ?reason, "Splice skipped");
                return SpliceOutcome::Skipped(reason);
            }
        };

        let wrapper = build_wrapper(dom, original, transformed, meta);
        let result = dom.as_internal(|dom| dom.replace_child(parent, wrapper, node));
        if let Err(e) = result {
            // Unreachable after check_target, but never leave a half-built wrapper around.
            debug!(node = %node, error = %e, "Splice aborted");
            let _ = dom.free(wrapper);
            return SpliceOutcome::Skipped(SkipReason::ParentDetached);
        }

        // The wrapper now carries the original string; the old node is done.
        let _ = dom.free(node);

        let total = self.applied.fetch_add(1, Ordering::Relaxed) + 1;
        trace!(node = %node, wrapper = %wrapper, total, "Splice applied");

        self.sink.record(MetricsEvent {
            original_text: original.to_string(),
            transformed_text: transformed.to_string(),
            toxicity_score: meta.toxicity_score,
            service: meta.service,
            prompt_style: meta.prompt_style.clone(),
            processing_time_ms: meta.processing_time_ms,
            url: meta.url.clone(),
        });

        SpliceOutcome::Applied { wrapper }
    }
}

fn check_target(dom: &Dom, node: NodeId) -> Result<NodeId, SkipReason> {
    if !dom.contains(node) || !dom.is_connected(node) {
        return Err(SkipReason::NodeDetached);
    }
    if !dom.is_text(node) {
        return Err(SkipReason::NotAText);
    }
    let parent = dom.parent(node).ok_or(SkipReason::ParentMissing)?;
    if !dom.is_element(parent) {
        return Err(SkipReason::ParentNotElement);
    }
    if !dom.is_connected(parent) {
        return Err(SkipReason::ParentDetached);
    }
    if dom.tag(parent).is_some_and(|tag| RAW_TEXT_TAGS.contains(&tag)) {
        return Err(SkipReason::RawTextParent);
    }
    Ok(parent)
}

fn build_wrapper(dom: &mut Dom, original: &str, transformed: &str, meta: &SpliceMeta) -> NodeId {
    let class = if meta.show_highlight {
        WRAPPER_CLASS
    } else {
        WRAPPER_PLAIN_CLASS
    };
    let wrapper = dom.create_element("span");
    let text = dom.create_text(transformed);
    // Both nodes are fresh and detached, none of these writes can fail.
    let _ = dom.set_attribute(wrapper, "class", class);
    let _ = dom.set_attribute(wrapper, ATTR_ORIGINAL, original);
    let _ = dom.set_attribute(wrapper, ATTR_TRANSFORMED, transformed);
    let _ = dom.set_attribute(wrapper, ATTR_CURRENT, CURRENT_TRANSFORMED);
    let _ = dom.set_attribute(wrapper, ATTR_SERVICE, meta.service.as_str());
    let _ = dom.append_child(wrapper, text);
    wrapper
}

/// Fallback for a skipped splice: overwrite the text node's data in place.
///
/// Loses hover and revert, emits no metrics event. Returns false when the
/// node itself is gone, in which case the update is dropped.
pub fn replace_text_in_place(dom: &mut Dom, node: NodeId, transformed: &str) -> bool {
    if !dom.is_text(node) || !dom.is_connected(node) {
        return false;
    }
    dom.as_internal(|dom| dom.set_text(node, transformed)).is_ok()
}

/// Restore every wrapper to a plain text node holding its stored original
/// string. Returns the number of wrappers reverted.
pub fn revert_all(dom: &mut Dom) -> usize {
    let mut wrappers = dom.query_class(WRAPPER_CLASS);
    wrappers.extend(dom.query_class(WRAPPER_PLAIN_CLASS));

    let mut reverted = 0;
    for wrapper in wrappers {
        let Some(parent) = dom.parent(wrapper) else {
            continue;
        };
        let original = dom
            .attribute(wrapper, ATTR_ORIGINAL)
            .unwrap_or_default()
            .to_string();
        let text = dom.create_text(&original);
        let swapped = dom.as_internal(|dom| dom.replace_child(parent, text, wrapper));
        if swapped.is_ok() {
            let _ = dom.free(wrapper);
            reverted += 1;
        } else {
            let _ = dom.free(text);
        }
    }
    debug!(reverted, "Reverted spliced fragments");
    reverted
}

#[cfg(test)]
#[path = "splice_tests.rs"]
mod tests;
