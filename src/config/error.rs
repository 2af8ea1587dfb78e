//! Configuration error types

use thiserror::Error;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(&'static str),

    #[error("Provider base URL must be an absolute http(s) URL")]
    InvalidBaseUrl,

    #[error("A secret key (sk_) must never be shipped to the client")]
    SecretKeyInClient,

    #[error("Publishable key must start with 'pk_'")]
    InvalidPublishableKey,

    #[error("Request timeout must be between 1 and 300 seconds")]
    InvalidTimeout,

    #[error("Route path '{0}' must start with '/'")]
    InvalidRoutePath(String),

    #[error("App URL must be an absolute http(s) URL")]
    InvalidAppUrl,

    #[error("Reconcile max_attempts must be at least 1")]
    InvalidMaxAttempts,

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
}
