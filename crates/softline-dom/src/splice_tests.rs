use super::*;
use crate::mutation::MutationOrigin;
use crate::render::render_html;
use parking_lot::Mutex;

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<MetricsEvent>>,
}

impl MetricsSink for RecordingSink {
    fn record(&self, event: MetricsEvent) {
        self.events.lock().push(event);
    }
}

fn meta(show_highlight: bool) -> SpliceMeta {
    SpliceMeta {
        service: ServiceKind::Primary,
        toxicity_score: 0.7,
        prompt_style: "DEFAULT".to_string(),
        processing_time_ms: 42,
        show_highlight,
        url: Some("https://example.com/thread".to_string()),
    }
}

fn setup() -> (Dom, NodeId, NodeId, Arc<RecordingSink>, SpliceEngine) {
    let mut dom = Dom::new();
    let p = dom.create_element("p");
    let t = dom.create_text("you are stupid");
    dom.append_child(p, t).unwrap();
    let body = dom.body();
    dom.append_child(body, p).unwrap();
    let sink = Arc::new(RecordingSink::default());
    let engine = SpliceEngine::new(sink.clone());
    (dom, p, t, sink, engine)
}

#[test]
fn test_splice_builds_wrapper() {
    let (mut dom, p, t, sink, engine) = setup();
    let outcome = engine.splice(&mut dom, t, "you are stupid", "I disagree", &meta(true));

    let SpliceOutcome::Applied { wrapper } = outcome else {
        panic!("expected applied, got {outcome:?}");
    };
    assert_eq!(dom.children(p), &[wrapper]);
    assert!(dom.has_class(wrapper, WRAPPER_CLASS));
    assert_eq!(dom.attribute(wrapper, ATTR_ORIGINAL), Some("you are stupid"));
    assert_eq!(dom.attribute(wrapper, ATTR_TRANSFORMED), Some("I disagree"));
    assert_eq!(dom.attribute(wrapper, ATTR_CURRENT), Some(CURRENT_TRANSFORMED));
    assert_eq!(dom.attribute(wrapper, ATTR_SERVICE), Some("primary"));
    assert_eq!(dom.text_content(p), "I disagree");
    assert!(!dom.contains(t));

    assert_eq!(engine.applied_count(), 1);
    let events = sink.events.lock();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].original_text, "you are stupid");
    assert_eq!(events[0].transformed_text, "I disagree");
    assert_eq!(events[0].processing_time_ms, 42);
    assert_eq!(events[0].url.as_deref(), Some("https://example.com/thread"));
}

#[test]
fn test_splice_without_highlight_uses_plain_class() {
    let (mut dom, _, t, _, engine) = setup();
    let outcome = engine.splice(&mut dom, t, "you are stupid", "I disagree", &meta(false));
    let SpliceOutcome::Applied { wrapper } = outcome else {
        panic!("expected applied");
    };
    assert!(dom.has_class(wrapper, WRAPPER_PLAIN_CLASS));
    assert!(!dom.has_class(wrapper, WRAPPER_CLASS));
    assert!(is_wrapper(&dom, wrapper));
}

#[test]
fn test_splice_detached_node_is_skipped() {
    let (mut dom, p, t, sink, engine) = setup();
    dom.remove(t).unwrap();
    dom.observe();

    let outcome = engine.splice(&mut dom, t, "you are stupid", "I disagree", &meta(true));
    assert_eq!(outcome, SpliceOutcome::Skipped(SkipReason::NodeDetached));
    assert!(dom.children(p).is_empty());
    assert_eq!(dom.pending_records(), 0);
    assert_eq!(engine.applied_count(), 0);
    assert!(sink.events.lock().is_empty());
}

#[test]
fn test_splice_freed_node_is_skipped() {
    let (mut dom, p, t, sink, engine) = setup();
    dom.free(p).unwrap();
    let outcome = engine.splice(&mut dom, t, "a", "b", &meta(true));
    assert_eq!(outcome, SpliceOutcome::Skipped(SkipReason::NodeDetached));
    assert!(sink.events.lock().is_empty());
}

#[test]
fn test_splice_element_target_is_skipped() {
    let (mut dom, p, _, _, engine) = setup();
    let outcome = engine.splice(&mut dom, p, "a", "b", &meta(true));
    assert_eq!(outcome, SpliceOutcome::Skipped(SkipReason::NotAText));
}

#[test]
fn test_splice_records_are_internal() {
    let (mut dom, _, t, _, engine) = setup();
    dom.observe();
    engine.splice(&mut dom, t, "you are stupid", "I disagree", &meta(true));
    let records = dom.take_records();
    assert!(!records.is_empty());
    assert!(records.iter().all(|r| r.origin == MutationOrigin::Internal));
}

#[test]
fn test_splice_escapes_on_render() {
    let (mut dom, p, t, _, engine) = setup();
    engine.splice(&mut dom, t, "<b>\"x\"</b>", "a & b", &meta(true));
    let html = render_html(&dom, p);
    assert!(html.contains("data-original=\"&lt;b&gt;&quot;x&quot;&lt;/b&gt;\""));
    assert!(html.contains(">a &amp; b</span>"));
}

#[test]
fn test_replace_text_in_place() {
    let (mut dom, p, t, sink, _) = setup();
    dom.observe();
    assert!(replace_text_in_place(&mut dom, t, "calmer"));
    assert_eq!(dom.text_content(p), "calmer");
    assert!(dom.take_records().iter().all(|r| r.is_internal()));
    assert!(sink.events.lock().is_empty());

    dom.remove(t).unwrap();
    assert!(!replace_text_in_place(&mut dom, t, "dropped"));
    assert_eq!(dom.text(t), Some("calmer"));
}

#[test]
fn test_revert_all_restores_stored_original() {
    let (mut dom, p, t, _, engine) = setup();
    let SpliceOutcome::Applied { wrapper } =
        engine.splice(&mut dom, t, "you are stupid", "I disagree", &meta(true))
    else {
        panic!("expected applied");
    };
    // Live text drifts; revert must use the attribute, not the live text.
    let inner = dom.children(wrapper)[0];
    dom.set_text(inner, "something else").unwrap();

    assert_eq!(revert_all(&mut dom), 1);
    assert_eq!(dom.text_content(p), "you are stupid");
    assert!(dom.query_class(WRAPPER_CLASS).is_empty());
    assert!(!dom.contains(wrapper));
}

#[test]
fn test_revert_all_handles_both_classes() {
    let mut dom = Dom::from_paragraphs("first bad\nsecond bad");
    let body = dom.body();
    let texts = dom.text_nodes(body, |_, _| false);
    let engine = SpliceEngine::new(Arc::new(RecordingSink::default()));
    engine.splice(&mut dom, texts[0], "first bad", "first", &meta(true));
    engine.splice(&mut dom, texts[1], "second bad", "second", &meta(false));
    assert_eq!(dom.text_content(body), "firstsecond");

    assert_eq!(revert_all(&mut dom), 2);
    assert_eq!(dom.text_content(body), "first badsecond bad");
}

#[test]
fn test_splice_releases_replaced_node() {
    let (mut dom, _, t, _, engine) = setup();
    let before = dom.live_nodes();
    let outcome = engine.splice(&mut dom, t, "you are stupid", "I disagree", &meta(true));
    assert!(outcome.is_applied());
    // Wrapper and its text in, the old text node out.
    assert_eq!(dom.live_nodes(), before + 1);
    assert_eq!(dom.text(t), None);
}

#[test]
fn test_raw_text_parent_is_skipped() {
    let mut dom = Dom::new();
    let area = dom.create_element("textarea");
    let t = dom.create_text("you are stupid");
    dom.append_child(area, t).unwrap();
    let body = dom.body();
    dom.append_child(body, area).unwrap();
    let sink = Arc::new(RecordingSink::default());
    let engine = SpliceEngine::new(sink.clone());
    dom.observe();

    let outcome = engine.splice(&mut dom, t, "you are stupid", "I disagree", &meta(true));
    assert_eq!(outcome, SpliceOutcome::Skipped(SkipReason::RawTextParent));
    assert_eq!(dom.children(area), &[t]);
    assert_eq!(dom.pending_records(), 0);
    assert!(sink.events.lock().is_empty());

    assert!(replace_text_in_place(&mut dom, t, "I disagree"));
    assert_eq!(dom.text(t), Some("I disagree"));
    assert!(dom.take_records().iter().all(|r| r.is_internal()));
    assert!(sink.events.lock().is_empty());
}
