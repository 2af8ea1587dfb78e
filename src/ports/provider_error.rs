//! Failure type shared by every provider port.
//!
//! Mirrors what the provider reported: a coarse code for branching, the
//! provider's message for logs, and whether retrying may help.

use serde::{Deserialize, Serialize};

/// Errors from identity/billing provider operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderError {
    /// Error code for categorization.
    pub code: ProviderErrorCode,

    /// Human-readable message.
    pub message: String,

    /// HTTP status reported by the provider, when there was one.
    pub status: Option<u16>,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl ProviderError {
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
            retryable: code.is_retryable(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::Network, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::Unauthorized, message)
    }

    pub fn not_found(resource: &str) -> Self {
        Self::new(ProviderErrorCode::NotFound, format!("{} not found", resource))
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::RateLimited, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InvalidResponse, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::Provider, message)
    }

    /// Maps an HTTP status to the matching error code.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let code = match status {
            401 | 403 => ProviderErrorCode::Unauthorized,
            404 => ProviderErrorCode::NotFound,
            429 => ProviderErrorCode::RateLimited,
            _ => ProviderErrorCode::Provider,
        };
        let mut err = Self::new(code, message).with_status(status);
        // Gateway failures are transient even though the code is generic.
        if matches!(status, 502..=504) {
            err.retryable = true;
        }
        err
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ProviderError {}

/// Provider error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorCode {
    /// Network connectivity issue or timeout.
    Network,

    /// Missing or expired session.
    Unauthorized,

    /// Resource not found.
    NotFound,

    /// Rate limit exceeded.
    RateLimited,

    /// Response body did not match the expected shape.
    InvalidResponse,

    /// Provider reported a server-side failure.
    Provider,

    /// Unknown error.
    Unknown,
}

impl ProviderErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderErrorCode::Network | ProviderErrorCode::RateLimited
        )
    }
}

impl std::fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProviderErrorCode::Network => "network_error",
            ProviderErrorCode::Unauthorized => "unauthorized",
            ProviderErrorCode::NotFound => "not_found",
            ProviderErrorCode::RateLimited => "rate_limited",
            ProviderErrorCode::InvalidResponse => "invalid_response",
            ProviderErrorCode::Provider => "provider_error",
            ProviderErrorCode::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}
