//! Provider error types.

use reqwest::StatusCode;
use thiserror::Error;

pub type ProviderResult<T> = Result<T, ProviderError>;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} request failed: {source}")]
    Network {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned {status}: {body}")]
    Status {
        provider: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("Invalid {provider} response: {message}")]
    InvalidResponse {
        provider: &'static str,
        message: String,
    },

    #[error("Failed to parse {provider} response: {source}")]
    Json {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ProviderError {
    pub fn network(provider: &'static str, source: reqwest::Error) -> Self {
        Self::Network { provider, source }
    }

    pub fn invalid_response(provider: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider,
            message: message.into(),
        }
    }

    pub fn json(provider: &'static str, source: serde_json::Error) -> Self {
        Self::Json { provider, source }
    }

    /// Name of the provider that failed.
    pub fn provider(&self) -> &'static str {
        match self {
            ProviderError::Network { provider, .. }
            | ProviderError::Status { provider, .. }
            | ProviderError::InvalidResponse { provider, .. }
            | ProviderError::Json { provider, .. } => provider,
        }
    }

    /// True for failures of the request itself (transport or non-2xx).
    ///
    /// Everything else means the provider answered with something we could
    /// not make sense of.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            ProviderError::Network { .. } | ProviderError::Status { .. }
        )
    }
}
