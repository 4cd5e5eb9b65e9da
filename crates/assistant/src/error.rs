use thiserror::Error;

/// Failures reported by a [`TextGenerator`](crate::provider::TextGenerator).
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("No text generation provider is configured")]
    NotConfigured,

    #[error("Provider rate limit exceeded")]
    RateLimited,

    #[error("Provider rejected the API key")]
    Unauthorized,

    #[error("Requested model is not available")]
    ModelUnavailable,

    #[error("Provider request failed: {0}")]
    Request(String),
}

impl ProviderError {
    /// Classify an HTTP failure from a provider API.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            429 => Self::RateLimited,
            401 | 403 => Self::Unauthorized,
            404 => Self::ModelUnavailable,
            _ => Self::Request(format!("HTTP {status}: {body}")),
        }
    }
}

/// Why a model answer could not be turned into risks or actions.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Model output contains no JSON array")]
    NoJsonArray,

    #[error("Model output is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Model output contains no usable entries")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_from_status_classifies_known_codes() {
        assert_matches!(ProviderError::from_status(429, ""), ProviderError::RateLimited);
        assert_matches!(ProviderError::from_status(401, ""), ProviderError::Unauthorized);
        assert_matches!(ProviderError::from_status(403, ""), ProviderError::Unauthorized);
        assert_matches!(ProviderError::from_status(404, ""), ProviderError::ModelUnavailable);
    }

    #[test]
    fn test_from_status_keeps_body_for_other_codes() {
        let err = ProviderError::from_status(500, "upstream down");
        assert_eq!(err.to_string(), "Provider request failed: HTTP 500: upstream down");
    }

    #[test]
    fn test_provider_error_is_transparent_in_generation_error() {
        let err = GenerationError::from(ProviderError::RateLimited);
        assert_eq!(err.to_string(), "Provider rate limit exceeded");
    }
}
