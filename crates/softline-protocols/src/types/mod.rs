//! Shared data model.

mod fragment;
mod metrics;
mod service;
mod settings;
mod style;
mod transform;

pub use fragment::*;
pub use metrics::*;
pub use service::*;
pub use settings::*;
pub use style::*;
pub use transform::*;

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
