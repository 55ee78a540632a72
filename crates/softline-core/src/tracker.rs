//! Per-node claim state.
//!
//! The tracker is keyed by [`NodeId`], never by text: two nodes with the same
//! words are distinct fragments. State lives beside the document, so a claim
//! is never visible as page content.

use std::collections::HashMap;

use parking_lot::Mutex;
use softline_dom::{Dom, NodeId};
use softline_protocols::{FragmentState, PipelineError, Resolution};

#[derive(Debug, Default)]
pub struct FragmentTracker {
    states: Mutex<HashMap<NodeId, FragmentState>>,
}

impl FragmentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `node` for the transform step.
    ///
    /// Fails with `DetachedNode` if the node is not in the document, and
    /// `DuplicateSubmission` if it already has a state.
    pub fn claim(&self, dom: &Dom, node: NodeId) -> Result<(), PipelineError> {
        if !dom.is_connected(node) {
            return Err(PipelineError::DetachedNode);
        }
        let mut states = self.states.lock();
        if states.contains_key(&node) {
            return Err(PipelineError::DuplicateSubmission);
        }
        states.insert(node, FragmentState::Pending);
        Ok(())
    }

    /// True iff this call claimed the node.
    pub fn try_claim(&self, dom: &Dom, node: NodeId) -> bool {
        self.claim(dom, node).is_ok()
    }

    /// Record a gate rejection. Has no effect on a node that already has a state.
    pub fn mark_gated(&self, node: NodeId) {
        self.states.lock().entry(node).or_insert(FragmentState::Gated);
    }

    pub fn resolve(&self, node: NodeId, resolution: Resolution) {
        self.states.lock().insert(node, FragmentState::Resolved(resolution));
    }

    /// Forget `node` so it can be claimed again.
    pub fn release(&self, node: NodeId) {
        self.states.lock().remove(&node);
    }

    pub fn state(&self, node: NodeId) -> FragmentState {
        self.states
            .lock()
            .get(&node)
            .copied()
            .unwrap_or(FragmentState::Unseen)
    }

    /// Whether the node has been gated or claimed before.
    pub fn is_known(&self, node: NodeId) -> bool {
        self.states.lock().contains_key(&node)
    }

    /// Drop entries whose node has been freed. Returns how many were removed.
    pub fn prune(&self, dom: &Dom) -> usize {
        let mut states = self.states.lock();
        let before = states.len();
        states.retain(|node, _| dom.contains(*node));
        before - states.len()
    }

    /// Forget everything.
    pub fn clear(&self) {
        self.states.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.states.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
