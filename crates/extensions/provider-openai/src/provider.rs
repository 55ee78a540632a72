//! OpenAI rewrite backend implementation.

use async_trait::async_trait;
use tracing::debug;

use softline_protocols::{
    ProviderError, RewriteOutput, ServiceKind, TransformBackend, TransformRequest,
};

use crate::api::{ApiErrorBody, ApiMessage, ApiRequest, ApiResponse};

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Chat-completion backend: sends the style instruction as the system
/// message and the fragment as the user message.
pub struct OpenAIBackend {
    api_key: String,
    api_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    client: reqwest::Client,
}

impl OpenAIBackend {
    pub fn new(api_key: String) -> Self {
        Self::with_url(api_key, DEFAULT_API_URL.to_string())
    }

    /// Create backend with custom API URL (for OpenAI-compatible APIs).
    pub fn with_url(api_key: String, api_url: String) -> Self {
        Self {
            api_key,
            api_url,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn build_request(&self, request: &TransformRequest) -> ApiRequest {
        ApiRequest {
            model: self.model.clone(),
            messages: vec![
                ApiMessage::system(request.system_prompt.clone()),
                ApiMessage::user(request.text.clone()),
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    async fn send_request(&self, api_request: &ApiRequest) -> Result<ApiResponse, ProviderError> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(api_request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: error_message(&body, status.as_u16()),
            });
        }

        serde_json::from_str(&body).map_err(|e| ProviderError::MalformedResponse(e.to_string()))
    }
}

/// `error.message` from the body, else the raw body, else the status.
fn error_message(body: &str, status: u16) -> String {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) {
        return parsed.error.message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {status}")
    } else {
        trimmed.to_string()
    }
}

fn parse_response(response: ApiResponse) -> Result<RewriteOutput, ProviderError> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| ProviderError::MalformedResponse("no message content in choices".to_string()))?;
    Ok(RewriteOutput {
        text: content.trim().to_string(),
        model: response.model,
    })
}

#[async_trait]
impl TransformBackend for OpenAIBackend {
    fn id(&self) -> &str {
        "openai"
    }

    fn kind(&self) -> ServiceKind {
        ServiceKind::Primary
    }

    async fn rewrite(&self, request: TransformRequest) -> Result<RewriteOutput, ProviderError> {
        if self.api_key.trim().is_empty() {
            return Err(ProviderError::MissingCredentials("openai".to_string()));
        }
        let api_request = self.build_request(&request);
        debug!(model = %self.model, chars = request.text.len(), "Sending chat completion");
        let response = self.send_request(&api_request).await?;
        parse_response(response)
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
