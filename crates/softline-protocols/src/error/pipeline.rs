//! Pipeline errors.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Node is no longer attached to the document")]
    DetachedNode,

    #[error("Node was already submitted")]
    DuplicateSubmission,

    #[error("Extension context invalidated")]
    ContextInvalidated,

    #[error("Pipeline is stopped")]
    Stopped,
}
