//! Hugging Face inference backends for Softline.
//!
//! - [`HuggingFaceBackend`] - summarization model used as the secondary rewrite backend
//! - [`HuggingFaceClassifier`] - remote toxicity classifier

mod api;
mod classifier;
mod provider;

pub use classifier::{DEFAULT_CLASSIFIER_URL, HuggingFaceClassifier, extract_toxicity_score};
pub use provider::{DEFAULT_API_BASE, DEFAULT_MODEL, HuggingFaceBackend, extract_generated_text};
