//! Mutation records delivered to the document observer.

use crate::node::NodeId;

/// Who caused a mutation.
///
/// Writes made by the splice and hover steps are tagged `Internal` so the
/// observer can tell them apart from page-script changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOrigin {
    External,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    ChildList,
    CharacterData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub kind: MutationKind,
    pub target: NodeId,
    pub added: Vec<NodeId>,
    pub removed: Vec<NodeId>,
    pub origin: MutationOrigin,
}

impl MutationRecord {
    pub fn is_internal(&self) -> bool {
        self.origin == MutationOrigin::Internal
    }
}
