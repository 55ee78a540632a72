//! DOM errors.

use thiserror::Error;

use crate::node::NodeId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("Stale node handle: {0}")]
    StaleNode(NodeId),

    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("Node {0} is not a text node")]
    NotAText(NodeId),

    #[error("Node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },

    #[error("Cannot insert {0} into its own subtree")]
    HierarchyRequest(NodeId),

    #[error("The document body cannot be removed")]
    BodyRemoval,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let id = NodeId::new(3, 1);
        assert!(DomError::StaleNode(id).to_string().contains("3v1"));
        let err = DomError::NotAChild {
            parent: NodeId::new(0, 0),
            child: id,
        };
        assert!(err.to_string().contains("not a child"));
    }
}
