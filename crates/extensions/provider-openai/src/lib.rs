//! OpenAI chat-completion rewrite backend for Softline.

mod api;
mod provider;

pub use provider::{DEFAULT_API_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, OpenAIBackend};
