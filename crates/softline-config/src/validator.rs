//! Configuration validation.

use softline_protocols::RewriteStyle;

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error, if any, into a `ConfigError`.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_settings(config, &mut result);
        Self::validate_providers(config, &mut result);
        Self::validate_scorer(config, &mut result);
        Self::validate_metrics(config, &mut result);

        result
    }

    fn validate_settings(config: &Config, result: &mut ValidationResult) {
        let settings = &config.settings;

        if !(0.0..=1.0).contains(&settings.toxicity_threshold) {
            result.add_error(ValidationError::new(
                "settings.toxicity_threshold",
                "toxicity_threshold must be within [0, 1]",
            ));
        }

        if RewriteStyle::from_key(&settings.style_key).is_none() {
            result.add_warning(ValidationWarning::new(
                "settings.style_key",
                format!(
                    "Unknown style key '{}', the DEFAULT style will be used",
                    settings.style_key
                ),
            ));
        }

        let provider_id = settings.backend.provider_id();
        if settings.use_remote_transform && config.provider(provider_id).is_none() {
            result.add_warning(ValidationWarning::new(
                "settings.backend",
                format!(
                    "Backend '{}' selected but [providers.{}] is not configured, only {}_API_KEY can supply it",
                    settings.backend,
                    provider_id,
                    provider_id.to_uppercase()
                ),
            ));
        }
    }

    fn validate_providers(config: &Config, result: &mut ValidationResult) {
        for (name, provider) in &config.providers {
            match provider.api_key.as_deref() {
                None | Some("") => {
                    result.add_warning(ValidationWarning::new(
                        format!("providers.{}.api_key", name),
                        "API key is not set, requests to this provider will fail",
                    ));
                }
                Some(_) => {}
            }

            if let Some(ref url) = provider.base_url {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    result.add_error(ValidationError::new(
                        format!("providers.{}.base_url", name),
                        "base_url must start with http:// or https://",
                    ));
                }
            }

            if let Some(temperature) = provider.temperature {
                if !(0.0..=2.0).contains(&temperature) {
                    result.add_error(ValidationError::new(
                        format!("providers.{}.temperature", name),
                        "temperature must be within [0, 2]",
                    ));
                }
            }
        }
    }

    fn validate_scorer(config: &Config, result: &mut ValidationResult) {
        if config.scorer.remote && config.scorer.api_key.is_none() {
            result.add_warning(ValidationWarning::new(
                "scorer.api_key",
                "Remote scoring enabled without a token, the local fallback will be used",
            ));
        }

        if let Some(ref url) = config.scorer.url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                result.add_error(ValidationError::new(
                    "scorer.url",
                    "url must start with http:// or https://",
                ));
            }
        }
    }

    fn validate_metrics(config: &Config, result: &mut ValidationResult) {
        if config.metrics.history_limit == 0 {
            result.add_error(ValidationError::new(
                "metrics.history_limit",
                "history_limit must be greater than 0",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
