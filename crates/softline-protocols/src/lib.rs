//! # Softline Protocols
//!
//! Shared data model, wire messages and trait seams for Softline.
//! Contains only definitions; implementations live in `softline-core`,
//! `softline-dom` and the provider extensions.
//!
//! ## Core Traits
//!
//! - [`TransformBackend`] - a remote rewrite provider
//! - [`ToxicityClassifier`] - a remote toxicity classifier
//! - [`MetricsSink`] - receiver of per-replacement metrics events

pub mod backend;
pub mod classifier;
pub mod error;
pub mod message;
pub mod sink;
pub mod types;

pub use backend::{RewriteOutput, TransformBackend, TransformRequest};
pub use classifier::{ScoreMethod, ToxicityAssessment, ToxicityClassifier, ToxicityLevel};
pub use error::{PipelineError, ProviderError};
pub use message::{ExtensionMessage, ExtensionResponse};
pub use sink::MetricsSink;
pub use types::*;
