//! Remote provider errors.

use thiserror::Error;

/// Failure talking to a remote rewrite or classification service.
///
/// `Network` and `ApiError` are transport failures; `MalformedResponse`
/// covers bodies whose shape could not be decoded.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Missing credentials for {0}")]
    MissingCredentials(String),

    #[error("Extension context invalidated")]
    ContextInvalidated,
}

impl ProviderError {
    /// Whether the error came from the transport layer rather than the payload.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::ApiError { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ProviderError::ApiError {
            status: 401,
            message: "Invalid API key".to_string(),
        };
        assert!(err.to_string().contains("401"));
        assert!(err.to_string().contains("Invalid API key"));
    }

    #[test]
    fn test_malformed_display() {
        let err = ProviderError::MalformedResponse("no choices".to_string());
        assert!(err.to_string().contains("Malformed"));
    }

    #[test]
    fn test_missing_credentials_display() {
        let err = ProviderError::MissingCredentials("openai".to_string());
        assert!(err.to_string().contains("openai"));
    }

    #[test]
    fn test_is_transport() {
        assert!(ProviderError::Network("refused".to_string()).is_transport());
        assert!(ProviderError::ApiError { status: 500, message: String::new() }.is_transport());
        assert!(!ProviderError::MalformedResponse(String::new()).is_transport());
        assert!(!ProviderError::ContextInvalidated.is_transport());
    }
}
