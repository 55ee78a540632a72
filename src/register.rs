//! Backend and classifier registration from configuration.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use softline_config::{Config, ProviderConfig};
use softline_core::{KeywordGate, ToxicityScorer, TransformService};
use softline_protocols::ToxicityClassifier;
use softline_provider_huggingface::{HuggingFaceBackend, HuggingFaceClassifier};
use softline_provider_openai::OpenAIBackend;

/// API key from the provider entry, else `<NAME>_API_KEY`.
fn provider_key(
    name: &str,
    provider: Option<&ProviderConfig>,
    env: &dyn Fn(&str) -> Option<String>,
) -> Option<String> {
    provider
        .and_then(|p| p.api_key.clone())
        .or_else(|| env(&format!("{}_API_KEY", name.to_uppercase())))
        .filter(|key| !key.trim().is_empty())
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

pub(crate) fn build_transform_service(config: &Config) -> TransformService {
    build_transform_service_with(config, &process_env)
}

fn build_transform_service_with(
    config: &Config,
    env: &dyn Fn(&str) -> Option<String>,
) -> TransformService {
    let mut service = TransformService::new();

    let openai = config.provider("openai");
    match provider_key("openai", openai, env) {
        Some(key) => {
            let mut backend = match openai.and_then(|p| p.base_url.clone()) {
                Some(url) => OpenAIBackend::with_url(key, url),
                None => OpenAIBackend::new(key),
            };
            if let Some(p) = openai {
                if let Some(model) = &p.default_model {
                    backend = backend.with_model(model.clone());
                }
                if let Some(max_tokens) = p.max_tokens {
                    backend = backend.with_max_tokens(max_tokens);
                }
                if let Some(temperature) = p.temperature {
                    backend = backend.with_temperature(temperature);
                }
            }
            service.register(Arc::new(backend));
            info!("Registered OpenAI backend");
        }
        None => info!("Skipping provider 'openai': no API key configured or in environment"),
    }

    let huggingface = config.provider("huggingface");
    match provider_key("huggingface", huggingface, env) {
        Some(key) => {
            let mut backend = match huggingface.and_then(|p| p.base_url.clone()) {
                Some(url) => HuggingFaceBackend::with_url(key, url),
                None => HuggingFaceBackend::new(key),
            };
            if let Some(p) = huggingface {
                if let Some(model) = &p.default_model {
                    backend = backend.with_model(model.clone());
                }
                if let Some(max_length) = p.max_tokens {
                    backend = backend.with_max_length(max_length);
                }
            }
            service.register(Arc::new(backend));
            info!("Registered Hugging Face backend");
        }
        None => info!("Skipping provider 'huggingface': no API key configured or in environment"),
    }

    for name in config.providers.keys() {
        if name != "openai" && name != "huggingface" {
            warn!("Unknown provider type: '{}', skipping", name);
        }
    }

    service
}

pub(crate) fn build_scorer(config: &Config) -> ToxicityScorer {
    build_scorer_with(config, &process_env)
}

fn build_scorer_with(config: &Config, env: &dyn Fn(&str) -> Option<String>) -> ToxicityScorer {
    let scorer_config = &config.scorer;
    let classifier: Option<Arc<dyn ToxicityClassifier>> = if scorer_config.remote {
        // The classifier shares the Hugging Face token unless it has its own.
        let token = scorer_config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| provider_key("huggingface", config.provider("huggingface"), env));
        let classifier = match &scorer_config.url {
            Some(url) => HuggingFaceClassifier::with_url(token, url.clone()),
            None => HuggingFaceClassifier::new(token),
        };
        if !classifier.has_token() {
            info!("No classifier token; scoring will use the local fallback");
        }
        Some(Arc::new(classifier))
    } else {
        None
    };

    ToxicityScorer::new(classifier).with_batch_delay(Duration::from_millis(scorer_config.batch_delay_ms))
}

pub(crate) fn build_gate(config: &Config) -> KeywordGate {
    KeywordGate::with_extra_keywords(&config.gate.extra_keywords)
}
