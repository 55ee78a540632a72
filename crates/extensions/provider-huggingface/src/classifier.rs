//! Remote toxicity classifier.
//!
//! The inference endpoint answers in one of three shapes depending on the
//! model and API version; [`extract_toxicity_score`] is the only place that
//! probes them.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use softline_protocols::{ProviderError, ToxicityClassifier};

use crate::api::{ClassifyRequest, post_json};

pub const DEFAULT_CLASSIFIER_URL: &str =
    "https://router.huggingface.co/hf-inference/models/s-nlp/roberta_toxicity_classifier";

/// Score assumed when an object names the toxic label without a score.
const LABEL_ONLY_SCORE: f64 = 0.8;

pub struct HuggingFaceClassifier {
    api_token: Option<String>,
    url: String,
    client: reqwest::Client,
}

impl HuggingFaceClassifier {
    pub fn new(api_token: Option<String>) -> Self {
        Self::with_url(api_token, DEFAULT_CLASSIFIER_URL.to_string())
    }

    pub fn with_url(api_token: Option<String>, url: String) -> Self {
        Self {
            api_token: api_token.filter(|t| !t.trim().is_empty()),
            url,
            client: reqwest::Client::new(),
        }
    }

    pub fn has_token(&self) -> bool {
        self.api_token.is_some()
    }
}

#[async_trait]
impl ToxicityClassifier for HuggingFaceClassifier {
    fn id(&self) -> &str {
        "huggingface"
    }

    async fn classify(&self, text: &str) -> Result<f64, ProviderError> {
        let Some(token) = &self.api_token else {
            return Err(ProviderError::MissingCredentials("huggingface".to_string()));
        };
        let body = ClassifyRequest {
            inputs: text.to_string(),
        };
        let value = post_json(&self.client, &self.url, token, &body).await?;
        let score = extract_toxicity_score(&value).ok_or_else(|| {
            ProviderError::MalformedResponse(format!("no toxicity score in {value}"))
        })?;
        debug!(score, "Classifier score");
        Ok(score)
    }
}

/// Extract the toxic-class probability.
///
/// - `[[{label, score}, ..]]` (nested): the `toxic` label, else the max score.
/// - `[{label, score}, ..]` (flat): the `toxic` label, then a label naming
///   hate or offensive content, else the max score.
/// - `{label?, score?}` (object): its score, or 0.8 if it only carries a
///   `toxic` label.
///
/// Returns `None` when no finite score can be found.
pub fn extract_toxicity_score(value: &Value) -> Option<f64> {
    let score = match value {
        Value::Array(items) => match items.first()? {
            Value::Array(inner) => score_from_entries(inner, false),
            Value::Object(_) => score_from_entries(items, true),
            _ => None,
        },
        Value::Object(_) => match value.get("score").and_then(Value::as_f64) {
            Some(score) => Some(score),
            None => value
                .get("label")
                .and_then(Value::as_str)
                .filter(|label| is_toxic_label(label))
                .map(|_| LABEL_ONLY_SCORE),
        },
        _ => None,
    }?;
    score.is_finite().then_some(score)
}

fn score_from_entries(entries: &[Value], match_related: bool) -> Option<f64> {
    let labeled = |predicate: fn(&str) -> bool| {
        entries.iter().find_map(|e| {
            let label = e.get("label")?.as_str()?;
            predicate(label).then(|| e.get("score")?.as_f64()).flatten()
        })
    };

    if let Some(score) = labeled(is_toxic_label) {
        return Some(score);
    }
    if match_related {
        if let Some(score) = labeled(is_related_label) {
            return Some(score);
        }
    }
    // Label-free entries still count towards the maximum.
    entries
        .iter()
        .filter_map(|e| e.get("score")?.as_f64())
        .reduce(f64::max)
}

fn is_toxic_label(label: &str) -> bool {
    label.eq_ignore_ascii_case("toxic")
}

fn is_related_label(label: &str) -> bool {
    let upper = label.to_ascii_uppercase();
    upper.contains("HATE") || upper.contains("OFFENSIVE")
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
