//! Delegated hover handling for spliced wrappers.
//!
//! A single document-level handler receives every pointer event and resolves
//! the wrapper from the event target. The `data-current` attribute makes
//! repeated events idempotent; `data-hovering` marks a wrapper whose text is
//! being toggled so the pipeline ignores it.

use tracing::trace;

use crate::document::Dom;
use crate::error::DomError;
use crate::node::NodeId;
use crate::splice::{
    ATTR_CURRENT, ATTR_HOVERING, ATTR_ORIGINAL, ATTR_TRANSFORMED, CURRENT_ORIGINAL,
    CURRENT_TRANSFORMED, enclosing_wrapper,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    Enter,
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverOutcome {
    ShowedOriginal,
    ShowedTransformed,
    /// Target is not inside a wrapper, or the wrapper is already in the
    /// requested state.
    NoOp,
}

/// Whether `id` (or an enclosing wrapper) is mid-toggle.
pub fn is_hovering(dom: &Dom, id: NodeId) -> bool {
    dom.closest(id, |dom, node| dom.attribute(node, ATTR_HOVERING).is_some())
        .is_some()
}

pub fn handle_pointer(dom: &mut Dom, kind: PointerEventKind, target: NodeId) -> HoverOutcome {
    match kind {
        PointerEventKind::Enter => pointer_enter(dom, target),
        PointerEventKind::Leave => pointer_leave(dom, target),
    }
}

/// Show the original text.
pub fn pointer_enter(dom: &mut Dom, target: NodeId) -> HoverOutcome {
    let Some(wrapper) = enclosing_wrapper(dom, target) else {
        return HoverOutcome::NoOp;
    };
    if dom.attribute(wrapper, ATTR_CURRENT) == Some(CURRENT_ORIGINAL) {
        return HoverOutcome::NoOp;
    }
    let original = dom
        .attribute(wrapper, ATTR_ORIGINAL)
        .unwrap_or_default()
        .to_string();

    let result = dom.as_internal(|dom| {
        dom.set_attribute(wrapper, ATTR_HOVERING, "true")?;
        show_text(dom, wrapper, &original)?;
        dom.set_attribute(wrapper, ATTR_CURRENT, CURRENT_ORIGINAL)
    });
    match result {
        Ok(()) => {
            trace!(wrapper = %wrapper, "Showing original text");
            HoverOutcome::ShowedOriginal
        }
        Err(_) => HoverOutcome::NoOp,
    }
}

/// Restore the rewritten text.
pub fn pointer_leave(dom: &mut Dom, target: NodeId) -> HoverOutcome {
    let Some(wrapper) = enclosing_wrapper(dom, target) else {
        return HoverOutcome::NoOp;
    };
    if dom.attribute(wrapper, ATTR_CURRENT) == Some(CURRENT_TRANSFORMED) {
        return HoverOutcome::NoOp;
    }
    let transformed = dom
        .attribute(wrapper, ATTR_TRANSFORMED)
        .unwrap_or_default()
        .to_string();

    let result = dom.as_internal(|dom| {
        show_text(dom, wrapper, &transformed)?;
        dom.set_attribute(wrapper, ATTR_CURRENT, CURRENT_TRANSFORMED)?;
        dom.remove_attribute(wrapper, ATTR_HOVERING)
    });
    match result {
        Ok(()) => {
            trace!(wrapper = %wrapper, "Showing transformed text");
            HoverOutcome::ShowedTransformed
        }
        Err(_) => HoverOutcome::NoOp,
    }
}

/// Put `text` in the wrapper, reusing its single text child when it has one
/// so repeated toggles allocate nothing. Anything else inside is released.
fn show_text(dom: &mut Dom, wrapper: NodeId, text: &str) -> Result<(), DomError> {
    if let [only] = dom.children(wrapper) {
        let only = *only;
        if dom.is_text(only) {
            return dom.set_text(only, text);
        }
    }
    let stale = dom.children(wrapper).to_vec();
    dom.set_text_content(wrapper, text)?;
    for child in stale {
        dom.free(child)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use softline_protocols::{MetricsEvent, MetricsSink, ServiceKind};

    use super::*;
    use crate::splice::{SpliceEngine, SpliceMeta, SpliceOutcome};

    struct NullSink;

    impl MetricsSink for NullSink {
        fn record(&self, _event: MetricsEvent) {}
    }

    fn spliced() -> (Dom, NodeId) {
        let mut dom = Dom::from_paragraphs("you idiot");
        let body = dom.body();
        let text = dom.text_nodes(body, |_, _| false)[0];
        let engine = SpliceEngine::new(Arc::new(NullSink));
        let meta = SpliceMeta {
            service: ServiceKind::Primary,
            toxicity_score: 0.9,
            prompt_style: "DEFAULT".to_string(),
            processing_time_ms: 1,
            show_highlight: true,
            url: None,
        };
        let SpliceOutcome::Applied { wrapper } =
            engine.splice(&mut dom, text, "you idiot", "I see it differently", &meta)
        else {
            panic!("expected applied");
        };
        (dom, wrapper)
    }

    #[test]
    fn test_enter_shows_original() {
        let (mut dom, wrapper) = spliced();
        assert_eq!(pointer_enter(&mut dom, wrapper), HoverOutcome::ShowedOriginal);
        assert_eq!(dom.text_content(wrapper), "you idiot");
        assert_eq!(dom.attribute(wrapper, ATTR_CURRENT), Some(CURRENT_ORIGINAL));
        assert!(is_hovering(&dom, wrapper));
    }

    #[test]
    fn test_enter_then_leave_round_trip() {
        let (mut dom, wrapper) = spliced();
        pointer_enter(&mut dom, wrapper);
        assert_eq!(pointer_leave(&mut dom, wrapper), HoverOutcome::ShowedTransformed);
        assert_eq!(dom.text_content(wrapper), "I see it differently");
        assert_eq!(dom.attribute(wrapper, ATTR_CURRENT), Some(CURRENT_TRANSFORMED));
        assert!(!is_hovering(&dom, wrapper));
    }

    #[test]
    fn test_repeated_events_are_idempotent() {
        let (mut dom, wrapper) = spliced();
        assert_eq!(pointer_leave(&mut dom, wrapper), HoverOutcome::NoOp);
        pointer_enter(&mut dom, wrapper);
        assert_eq!(pointer_enter(&mut dom, wrapper), HoverOutcome::NoOp);
        assert_eq!(dom.text_content(wrapper), "you idiot");
    }

    #[test]
    fn test_target_inside_wrapper_resolves() {
        let (mut dom, wrapper) = spliced();
        let inner = dom.children(wrapper)[0];
        assert_eq!(
            handle_pointer(&mut dom, PointerEventKind::Enter, inner),
            HoverOutcome::ShowedOriginal
        );
    }

    #[test]
    fn test_non_wrapper_target_is_noop() {
        let mut dom = Dom::from_paragraphs("plain text");
        let body = dom.body();
        assert_eq!(pointer_enter(&mut dom, body), HoverOutcome::NoOp);
        assert_eq!(dom.text_content(body), "plain text");
    }

    #[test]
    fn test_hover_cycles_allocate_nothing() {
        let (mut dom, wrapper) = spliced();
        let before = dom.live_nodes();
        for _ in 0..1000 {
            pointer_enter(&mut dom, wrapper);
            pointer_leave(&mut dom, wrapper);
        }
        assert_eq!(dom.live_nodes(), before);
        assert_eq!(dom.text_content(wrapper), "I see it differently");
    }

    #[test]
    fn test_extra_wrapper_children_are_released() {
        let (mut dom, wrapper) = spliced();
        let extra = dom.create_text(" you idiot");
        dom.append_child(wrapper, extra).unwrap();
        let first = dom.children(wrapper)[0];
        let before = dom.live_nodes();

        pointer_enter(&mut dom, wrapper);
        assert_eq!(dom.text_content(wrapper), "you idiot");
        assert!(!dom.contains(extra));
        assert!(!dom.contains(first));
        assert_eq!(dom.live_nodes(), before - 1);

        // Back to one text child: later toggles reuse it.
        let inner = dom.children(wrapper)[0];
        pointer_leave(&mut dom, wrapper);
        assert_eq!(dom.children(wrapper), &[inner]);
    }

    #[test]
    fn test_toggle_writes_are_internal() {
        let (mut dom, wrapper) = spliced();
        dom.observe();
        pointer_enter(&mut dom, wrapper);
        pointer_leave(&mut dom, wrapper);
        let records = dom.take_records();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.is_internal()));
    }
}
