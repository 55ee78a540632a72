//! Observer-driven rewrite pipeline.
//!
//! Each discovered text node goes Gate -> Tracker -> Scorer -> Transform ->
//! Splice. Document access is synchronous and happens under the document
//! lock; the lock is never held across a network call, so every node is
//! re-validated after each await.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::future::join_all;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use softline_dom::hover::{self, HoverOutcome, PointerEventKind};
use softline_dom::splice::{enclosing_wrapper, is_wrapper, replace_text_in_place, revert_all};
use softline_dom::{Document, Dom, MutationKind, NodeId, SpliceEngine, SpliceMeta, SpliceOutcome};
use softline_protocols::{
    FragmentState, MetricsSink, PipelineError, Resolution, Settings, ToxicityAssessment,
    TransformResult,
};
use tracing::{debug, info, instrument, warn};

use crate::gate::KeywordGate;
use crate::scorer::ToxicityScorer;
use crate::tracker::FragmentTracker;
use crate::transform::{REMOTE_DISABLED, TransformService};

const SKIPPED_TAGS: &[&str] = &["script", "style"];

/// What happens to spliced fragments when the pipeline is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisablePolicy {
    /// Put every stored original string back.
    #[default]
    RevertAll,
    /// Leave rewrites in place; a reload restores the page.
    RequireReload,
}

#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Page URL attached to every metrics event.
    pub url: Option<String>,
    pub disable_policy: DisablePolicy,
}

/// Outcome of one fragment that reached the gate.
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentReport {
    pub node: NodeId,
    pub state: FragmentState,
    pub outcome: Option<SpliceOutcome>,
    pub assessment: Option<ToxicityAssessment>,
    pub error: Option<String>,
}

impl FragmentReport {
    fn new(node: NodeId, state: FragmentState) -> Self {
        Self {
            node,
            state,
            outcome: None,
            assessment: None,
            error: None,
        }
    }
}

/// Counts for one pass over a batch of nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassReport {
    pub discovered: usize,
    pub gated: usize,
    pub duplicates: usize,
    pub spliced: usize,
    pub fallback_replaced: usize,
    pub unchanged: usize,
    pub below_threshold: usize,
    pub failed: usize,
    pub dropped: usize,
    pub fragments: Vec<FragmentReport>,
}

impl PassReport {
    fn push(&mut self, report: FragmentReport) {
        match report.state {
            FragmentState::Gated => self.gated += 1,
            FragmentState::Resolved(Resolution::Spliced) => self.spliced += 1,
            FragmentState::Resolved(Resolution::TextReplaced) => self.fallback_replaced += 1,
            FragmentState::Resolved(Resolution::Unchanged) => self.unchanged += 1,
            FragmentState::Resolved(Resolution::BelowThreshold) => self.below_threshold += 1,
            FragmentState::Resolved(Resolution::Failed) => self.failed += 1,
            FragmentState::Resolved(Resolution::Dropped) => self.dropped += 1,
            FragmentState::Unseen | FragmentState::Pending => {}
        }
        self.fragments.push(report);
    }

    pub fn merge(&mut self, other: PassReport) {
        self.discovered += other.discovered;
        self.duplicates += other.duplicates;
        for report in other.fragments {
            self.push(report);
        }
    }

    /// Fragments whose text changed in the document.
    pub fn replaced(&self) -> usize {
        self.spliced + self.fallback_replaced
    }
}

/// A claimed fragment: the node, the exact string it held, and the trimmed
/// text sent for scoring and rewrite.
struct Fragment {
    node: NodeId,
    original: String,
    text: String,
}

pub struct MutationPipeline {
    document: Document,
    gate: KeywordGate,
    scorer: Arc<ToxicityScorer>,
    transform: Arc<TransformService>,
    tracker: FragmentTracker,
    splicer: SpliceEngine,
    settings: RwLock<Settings>,
    options: PipelineOptions,
    running: AtomicBool,
}

impl MutationPipeline {
    pub fn new(
        document: Document,
        scorer: Arc<ToxicityScorer>,
        transform: Arc<TransformService>,
        sink: Arc<dyn MetricsSink>,
        settings: Settings,
    ) -> Self {
        Self {
            document,
            gate: KeywordGate::new(),
            scorer,
            transform,
            tracker: FragmentTracker::new(),
            splicer: SpliceEngine::new(sink),
            settings: RwLock::new(settings),
            options: PipelineOptions::default(),
            running: AtomicBool::new(false),
        }
    }

    pub fn with_gate(mut self, gate: KeywordGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn tracker(&self) -> &FragmentTracker {
        &self.tracker
    }

    pub fn settings(&self) -> Settings {
        self.settings.read().clone()
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.read().enabled
    }

    /// Whether the observer is attached.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Successful splices so far.
    pub fn replace_count(&self) -> u64 {
        self.splicer.applied_count()
    }

    /// Attach the observer and walk the existing body once.
    #[instrument(skip(self))]
    pub async fn start(&self) -> Result<PassReport, PipelineError> {
        if !self.is_enabled() {
            return Err(PipelineError::Stopped);
        }
        let nodes = {
            let mut dom = self.document.lock();
            dom.observe();
            let body = dom.body();
            dom.text_nodes(body, skip_subtree)
        };
        self.running.store(true, Ordering::SeqCst);
        info!(candidates = nodes.len(), "Pipeline started");
        Ok(self.submit(&nodes).await)
    }

    /// Drain queued mutation records and process newly inserted text.
    pub async fn process_mutations(&self) -> Result<PassReport, PipelineError> {
        if !self.is_running() {
            return Err(PipelineError::Stopped);
        }
        let nodes = {
            let mut dom = self.document.lock();
            let pruned = self.tracker.prune(&dom);
            if pruned > 0 {
                debug!(pruned, "Dropped claims for released nodes");
            }
            let records = dom.take_records();
            let mut seen = HashSet::new();
            let mut nodes = Vec::new();
            for record in records {
                if record.is_internal() || record.kind != MutationKind::ChildList {
                    continue;
                }
                for added in record.added {
                    if !dom.is_connected(added)
                        || enclosing_wrapper(&dom, added).is_some()
                        || hover::is_hovering(&dom, added)
                    {
                        continue;
                    }
                    for node in dom.text_nodes(added, skip_subtree) {
                        if seen.insert(node) {
                            nodes.push(node);
                        }
                    }
                }
            }
            nodes
        };
        Ok(self.submit(&nodes).await)
    }

    /// Run `nodes` through the pipeline. Each node is transformed at most
    /// once over the pipeline's lifetime.
    pub async fn submit(&self, nodes: &[NodeId]) -> PassReport {
        let settings = self.settings();
        let mut report = PassReport::default();
        let mut claimed = Vec::new();

        {
            let dom = self.document.lock();
            for &node in nodes {
                report.discovered += 1;
                if self.tracker.is_known(node) {
                    report.duplicates += 1;
                    continue;
                }
                let Some(original) = dom.text(node).map(str::to_string) else {
                    continue;
                };
                let text = original.trim().to_string();
                if !self.gate.should_consider(&text) {
                    self.tracker.mark_gated(node);
                    report.push(FragmentReport::new(node, FragmentState::Gated));
                    continue;
                }
                match self.tracker.claim(&dom, node) {
                    Ok(()) => claimed.push(Fragment { node, original, text }),
                    Err(PipelineError::DuplicateSubmission) => report.duplicates += 1,
                    Err(_) => report.push(FragmentReport::new(
                        node,
                        FragmentState::Resolved(Resolution::Dropped),
                    )),
                }
            }
        }

        let results = join_all(
            claimed
                .into_iter()
                .map(|fragment| self.process_fragment(fragment, &settings)),
        )
        .await;

        let mut context_lost = false;
        for result in results {
            match result {
                Ok(fragment_report) => report.push(fragment_report),
                Err(fragment_report) => {
                    context_lost = true;
                    report.push(fragment_report);
                }
            }
        }
        if context_lost {
            self.teardown();
        }

        debug!(
            discovered = report.discovered,
            gated = report.gated,
            spliced = report.spliced,
            failed = report.failed,
            "Pass complete"
        );
        report
    }

    /// Score, rewrite and splice one claimed fragment. `Err` carries the
    /// report of a fragment whose transform hit a lost execution context.
    async fn process_fragment(
        &self,
        fragment: Fragment,
        settings: &Settings,
    ) -> Result<FragmentReport, FragmentReport> {
        let node = fragment.node;
        let assessment = self.scorer.score(&fragment.text).await;
        let mut report = FragmentReport::new(node, FragmentState::Pending);
        report.assessment = Some(assessment);

        if assessment.toxicity_score < settings.toxicity_threshold {
            return Ok(self.finish(report, Resolution::BelowThreshold));
        }

        let result = if settings.use_remote_transform {
            match self
                .transform
                .execute(&fragment.text, settings.backend, &settings.style_key)
                .await
            {
                Ok(result) => result,
                Err(e) => {
                    report.error = Some(e.to_string());
                    return Err(self.finish(report, Resolution::Failed));
                }
            }
        } else {
            TransformResult::failed(settings.backend, REMOTE_DISABLED, 0)
        };

        if !self.is_running() {
            return Ok(self.finish(report, Resolution::Dropped));
        }

        let transformed = match result.text() {
            Some(text) => text.to_string(),
            None => {
                report.error = result.error.clone();
                debug!(node = %node, error = ?result.error, "Transform failed, leaving fragment");
                return Ok(self.finish(report, Resolution::Failed));
            }
        };
        if transformed.is_empty() || transformed == fragment.text {
            return Ok(self.finish(report, Resolution::Unchanged));
        }

        let meta = SpliceMeta {
            service: result.service,
            toxicity_score: assessment.toxicity_score,
            prompt_style: settings.style_key.clone(),
            processing_time_ms: result.processing_time_ms,
            show_highlight: settings.show_highlight,
            url: self.options.url.clone(),
        };

        let resolution = {
            let mut dom = self.document.lock();
            let outcome =
                self.splicer
                    .splice(&mut dom, node, &fragment.original, &transformed, &meta);
            report.outcome = Some(outcome);
            match outcome {
                SpliceOutcome::Applied { .. } => Resolution::Spliced,
                SpliceOutcome::Skipped(reason) => {
                    if replace_text_in_place(&mut dom, node, &transformed) {
                        debug!(node = %node, ?reason, "Splice skipped, replaced text in place");
                        Resolution::TextReplaced
                    } else {
                        Resolution::Dropped
                    }
                }
            }
        };
        Ok(self.finish(report, resolution))
    }

    fn finish(&self, mut report: FragmentReport, resolution: Resolution) -> FragmentReport {
        self.tracker.resolve(report.node, resolution);
        report.state = FragmentState::Resolved(resolution);
        report
    }

    /// Detach the observer. Returns the number of fragments reverted.
    pub fn stop(&self, policy: DisablePolicy) -> usize {
        self.running.store(false, Ordering::SeqCst);
        let mut dom = self.document.lock();
        dom.disconnect();
        let reverted = match policy {
            DisablePolicy::RevertAll => revert_all(&mut dom),
            DisablePolicy::RequireReload => 0,
        };
        self.tracker.prune(&dom);
        info!(reverted, ?policy, "Pipeline stopped");
        reverted
    }

    fn teardown(&self) {
        warn!("Execution context invalidated, tearing down observer");
        self.running.store(false, Ordering::SeqCst);
        self.document.lock().disconnect();
    }

    /// Store new settings and start or stop to match `enabled`.
    pub async fn apply_settings(&self, settings: Settings) -> Result<Option<PassReport>, PipelineError> {
        let enabled = settings.enabled;
        *self.settings.write() = settings;
        debug!(enabled, "Settings applied");

        match (enabled, self.is_running()) {
            (true, false) => self.start().await.map(Some),
            (false, true) => {
                self.stop(self.options.disable_policy);
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    /// Flip `enabled`. Returns the new value.
    pub async fn toggle(&self) -> Result<bool, PipelineError> {
        let mut settings = self.settings();
        settings.enabled = !settings.enabled;
        let enabled = settings.enabled;
        self.apply_settings(settings).await?;
        Ok(enabled)
    }

    pub async fn enable(&self) -> Result<Option<PassReport>, PipelineError> {
        let mut settings = self.settings();
        settings.enabled = true;
        self.apply_settings(settings).await
    }

    /// Document-level pointer handler for the hover affordance.
    pub fn handle_pointer(&self, kind: PointerEventKind, target: NodeId) -> HoverOutcome {
        hover::handle_pointer(&mut self.document.lock(), kind, target)
    }
}

fn skip_subtree(dom: &Dom, id: NodeId) -> bool {
    dom.tag(id).is_some_and(|tag| SKIPPED_TAGS.contains(&tag))
        || is_wrapper(dom, id)
        || hover::is_hovering(dom, id)
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
