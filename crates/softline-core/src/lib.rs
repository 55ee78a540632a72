//! # Softline Core
//!
//! The rewrite pipeline and everything it drives:
//!
//! - [`KeywordGate`] - cheap lexical pre-filter
//! - [`ToxicityScorer`] - remote classifier with a deterministic fallback
//! - [`TransformService`] - style-aware rewrite over pluggable backends
//! - [`FragmentTracker`] - per-node claim state
//! - [`MutationPipeline`] - observer-driven coordinator
//! - [`MetricsStore`] - replacement history and aggregates
//! - [`MessageRouter`] - dispatch of extension messages

pub mod error;
pub mod fallback;
pub mod gate;
pub mod metrics;
pub mod pipeline;
pub mod prompts;
pub mod router;
pub mod scorer;
pub mod tracker;
pub mod transform;

pub use error::MetricsError;
pub use fallback::FallbackScorer;
pub use gate::KeywordGate;
pub use metrics::{DomainStat, MetricsStore, MetricsSummary};
pub use pipeline::{DisablePolicy, FragmentReport, MutationPipeline, PassReport, PipelineOptions};
pub use prompts::{available_styles, system_prompt};
pub use router::MessageRouter;
pub use scorer::ToxicityScorer;
pub use tracker::FragmentTracker;
pub use transform::TransformService;
