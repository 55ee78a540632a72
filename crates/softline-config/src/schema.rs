//! Configuration schema definitions.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use softline_protocols::Settings;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,

    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    #[serde(default)]
    pub scorer: ScorerConfig,

    #[serde(default)]
    pub metrics: MetricsConfig,

    #[serde(default)]
    pub gate: GateConfig,
}

impl Config {
    /// Provider entry by id (`"openai"`, `"huggingface"`).
    pub fn provider(&self, id: &str) -> Option<&ProviderConfig> {
        self.providers.get(id)
    }
}

/// Remote rewrite provider configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(default)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Remote toxicity classifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerConfig {
    /// Use the remote classifier; when false only the local fallback runs.
    #[serde(default = "default_remote")]
    pub remote: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Pause between calls when scoring a batch.
    #[serde(default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            remote: default_remote(),
            api_key: None,
            url: None,
            batch_delay_ms: default_batch_delay_ms(),
        }
    }
}

fn default_remote() -> bool {
    true
}

fn default_batch_delay_ms() -> u64 {
    100
}

/// Analytics storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            store_path: default_store_path(),
        }
    }
}

fn default_history_limit() -> usize {
    500
}

fn default_store_path() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".softline").join("analytics.json"))
        .unwrap_or_else(|| PathBuf::from(".softline/analytics.json"))
}

/// Keyword pre-filter configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GateConfig {
    /// Added to the built-in negative keyword set.
    #[serde(default)]
    pub extra_keywords: Vec<String>,
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
