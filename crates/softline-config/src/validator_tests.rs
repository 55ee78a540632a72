use super::*;
use crate::schema::ProviderConfig;
use softline_protocols::ServiceKind;

fn config_with_openai() -> Config {
    let mut config = Config::default();
    config.providers.insert(
        "openai".to_string(),
        ProviderConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        },
    );
    config.scorer.api_key = Some("hf-test".to_string());
    config
}

#[test]
fn test_valid_config() {
    let result = ConfigValidator::validate(&config_with_openai());
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_missing_selected_backend() {
    let mut config = config_with_openai();
    config.settings.backend = ServiceKind::Secondary;
    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "settings.backend"));
}

#[test]
fn test_missing_backend_ok_when_remote_disabled() {
    let mut config = Config::default();
    config.settings.use_remote_transform = false;
    config.scorer.remote = false;
    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(!result.warnings.iter().any(|w| w.path == "settings.backend"));
}

#[test]
fn test_threshold_out_of_range() {
    let mut config = config_with_openai();
    config.settings.toxicity_threshold = 1.5;
    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "settings.toxicity_threshold"));
}

#[test]
fn test_unknown_style_key_warns() {
    let mut config = config_with_openai();
    config.settings.style_key = "WORD_REPLACER".to_string();
    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "settings.style_key"));
}

#[test]
fn test_empty_api_key_warns() {
    let mut config = config_with_openai();
    config.providers.get_mut("openai").unwrap().api_key = Some(String::new());
    let result = ConfigValidator::validate(&config);
    assert!(result.warnings.iter().any(|w| w.path == "providers.openai.api_key"));
}

#[test]
fn test_invalid_base_url() {
    let mut config = config_with_openai();
    config.providers.get_mut("openai").unwrap().base_url = Some("ftp://example".to_string());
    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "providers.openai.base_url"));
}

#[test]
fn test_zero_history_limit() {
    let mut config = config_with_openai();
    config.metrics.history_limit = 0;
    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
}

#[test]
fn test_into_result_reports_first_error() {
    let mut config = config_with_openai();
    config.metrics.history_limit = 0;
    let err = ConfigValidator::validate(&config).into_result().unwrap_err();
    assert!(err.to_string().contains("history_limit"));
}

#[test]
fn test_scorer_without_token_warns() {
    let mut config = config_with_openai();
    config.scorer.api_key = None;
    let result = ConfigValidator::validate(&config);
    assert!(result.warnings.iter().any(|w| w.path == "scorer.api_key"));
}
