//! Errors surfaced by client operations.

use thiserror::Error;

use crate::ports::ProviderError;

/// Failure of a client operation.
///
/// A quota-exhausted track is a normal outcome and never appears here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("Provider client is not ready")]
    NotReady,

    #[error("Provider request failed: {0}")]
    Remote(#[from] ProviderError),

    #[error("Redirect failed: {0}")]
    RedirectFailure(String),
}

impl ClientError {
    pub fn redirect_failure(message: impl Into<String>) -> Self {
        ClientError::RedirectFailure(message.into())
    }

    /// Stable code for logs and host-side branching.
    pub fn code(&self) -> &'static str {
        match self {
            ClientError::NotReady => "NOT_READY",
            ClientError::Remote(_) => "REMOTE_ERROR",
            ClientError::RedirectFailure(_) => "REDIRECT_FAILURE",
        }
    }

    /// Whether the same call may succeed later.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::NotReady => true,
            ClientError::Remote(e) => e.retryable,
            ClientError::RedirectFailure(_) => false,
        }
    }

    /// Short notice suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            ClientError::NotReady => "Please wait, loading...",
            ClientError::Remote(_) => "Something went wrong. Please try again.",
            ClientError::RedirectFailure(_) => "Failed to create checkout session",
        }
    }
}
