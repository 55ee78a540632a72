//! Summarization model used as the secondary rewrite backend.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use softline_protocols::{
    ProviderError, RewriteOutput, ServiceKind, TransformBackend, TransformRequest,
};

use crate::api::{SummarizeParameters, SummarizeRequest, post_json};

pub const DEFAULT_API_BASE: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_MODEL: &str = "facebook/bart-large-cnn";

/// Sends the raw fragment to a summarization model. The style instruction
/// is not used; the model has no system prompt.
pub struct HuggingFaceBackend {
    api_token: String,
    api_base: String,
    model: String,
    parameters: SummarizeParameters,
    client: reqwest::Client,
}

impl HuggingFaceBackend {
    pub fn new(api_token: String) -> Self {
        Self::with_url(api_token, DEFAULT_API_BASE.to_string())
    }

    pub fn with_url(api_token: String, api_base: String) -> Self {
        Self {
            api_token,
            api_base: api_base.trim_end_matches('/').to_string(),
            model: DEFAULT_MODEL.to_string(),
            parameters: SummarizeParameters::default(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_length(mut self, max_length: u32) -> Self {
        self.parameters.max_length = max_length;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}", self.api_base, self.model)
    }
}

/// Pull the generated text out of whichever shape the model returned:
/// `[{"summary_text"|"generated_text"}]` first, then a bare object's
/// `generated_text`.
pub fn extract_generated_text(value: &Value) -> Option<String> {
    let field = |v: &Value, key: &str| v.get(key).and_then(Value::as_str).map(str::to_string);
    match value {
        Value::Array(items) => {
            let first = items.first()?;
            field(first, "summary_text").or_else(|| field(first, "generated_text"))
        }
        Value::Object(_) => field(value, "generated_text"),
        _ => None,
    }
}

#[async_trait]
impl TransformBackend for HuggingFaceBackend {
    fn id(&self) -> &str {
        "huggingface"
    }

    fn kind(&self) -> ServiceKind {
        ServiceKind::Secondary
    }

    async fn rewrite(&self, request: TransformRequest) -> Result<RewriteOutput, ProviderError> {
        if self.api_token.trim().is_empty() {
            return Err(ProviderError::MissingCredentials("huggingface".to_string()));
        }
        let body = SummarizeRequest {
            inputs: request.text.clone(),
            parameters: self.parameters.clone(),
        };
        debug!(model = %self.model, chars = request.text.len(), "Sending summarization");
        let value = post_json(&self.client, &self.endpoint(), &self.api_token, &body).await?;

        let text = match extract_generated_text(&value) {
            Some(text) => text.trim().to_string(),
            None => {
                debug!(model = %self.model, "No generated text in response, keeping original");
                request.text
            }
        };
        Ok(RewriteOutput {
            text,
            model: Some(self.model.clone()),
        })
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
