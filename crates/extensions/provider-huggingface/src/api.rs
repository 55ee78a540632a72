//! Hugging Face inference API types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use softline_protocols::ProviderError;

/// Summarization request.
#[derive(Debug, Serialize)]
pub struct SummarizeRequest {
    pub inputs: String,
    pub parameters: SummarizeParameters,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummarizeParameters {
    pub max_length: u32,
    pub min_length: u32,
    pub do_sample: bool,
}

impl Default for SummarizeParameters {
    fn default() -> Self {
        Self {
            max_length: 150,
            min_length: 30,
            do_sample: false,
        }
    }
}

/// Classification request.
#[derive(Debug, Serialize)]
pub struct ClassifyRequest {
    pub inputs: String,
}

/// Error envelope: `{"error": "...", "estimated_time": ...}`.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
    #[serde(default)]
    pub estimated_time: Option<f64>,
}

/// `error` from the body, else the raw body, else the status.
pub fn error_message(body: &str, status: u16) -> String {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) {
        return match parsed.estimated_time {
            Some(secs) => format!("{} (retry in ~{secs:.0}s)", parsed.error),
            None => parsed.error,
        };
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {status}")
    } else {
        trimmed.to_string()
    }
}

/// POST `body` with bearer auth and decode the reply as loose JSON.
pub async fn post_json<B: Serialize>(
    client: &reqwest::Client,
    url: &str,
    token: &str,
    body: &B,
) -> Result<Value, ProviderError> {
    let response = client
        .post(url)
        .bearer_auth(token)
        .json(body)
        .send()
        .await
        .map_err(|e| ProviderError::Network(e.to_string()))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ProviderError::Network(e.to_string()))?;

    if !status.is_success() {
        return Err(ProviderError::ApiError {
            status: status.as_u16(),
            message: error_message(&text, status.as_u16()),
        });
    }

    serde_json::from_str(&text).map_err(|e| ProviderError::MalformedResponse(e.to_string()))
}
