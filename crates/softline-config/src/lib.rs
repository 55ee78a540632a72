//! # Softline Config
//!
//! TOML configuration for the Softline pipeline: runtime settings, provider
//! credentials, scorer and metrics options.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
