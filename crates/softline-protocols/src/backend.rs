//! Rewrite backend trait.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::types::ServiceKind;

/// A single rewrite call.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformRequest {
    /// Text to rewrite, as observed in the document.
    pub text: String,
    /// Instruction selected by the style key. Backends that take no
    /// instruction ignore it.
    pub system_prompt: String,
}

impl TransformRequest {
    pub fn new(text: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            system_prompt: system_prompt.into(),
        }
    }
}

/// Backend output before normalization into a `TransformResult`.
#[derive(Debug, Clone, PartialEq)]
pub struct RewriteOutput {
    pub text: String,
    /// Model reported by the backend, if any.
    pub model: Option<String>,
}

/// A remote rewrite provider.
///
/// Implementations map their own request/response formats and report every
/// failure as a `ProviderError`; they never panic on bad payloads.
#[async_trait]
pub trait TransformBackend: Send + Sync {
    /// Provider identifier, e.g. `"openai"`.
    fn id(&self) -> &str;

    /// Which slot this backend fills.
    fn kind(&self) -> ServiceKind;

    async fn rewrite(&self, request: TransformRequest) -> Result<RewriteOutput, ProviderError>;
}
