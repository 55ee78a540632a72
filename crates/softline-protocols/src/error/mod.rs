//! Error types shared across the Softline crates.

mod pipeline;
mod provider;

pub use pipeline::*;
pub use provider::*;
