//! Identity/billing provider configuration

use serde::Deserialize;
use std::time::Duration;
use url::Url;

use super::error::ValidationError;
use crate::adapters::HttpProviderConfig;

/// Connection settings for the hosted provider API.
///
/// Only the publishable key belongs here. Secret keys stay on the
/// provider's side and are refused at validation time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderConfig {
    /// Provider API base URL (e.g. https://api.provider.example)
    pub base_url: Option<String>,

    /// Publishable key (pk_test_... or pk_live_...)
    pub publishable_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl ProviderConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Check if using a test-mode key
    pub fn is_test_mode(&self) -> bool {
        self.publishable_key
            .as_ref()
            .map(|k| k.starts_with("pk_test_"))
            .unwrap_or(false)
    }

    /// Validate provider configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or(ValidationError::MissingRequired("PROVIDER__BASE_URL"))?;
        parse_http_url(base_url).ok_or(ValidationError::InvalidBaseUrl)?;

        let key = self
            .publishable_key
            .as_deref()
            .ok_or(ValidationError::MissingRequired("PROVIDER__PUBLISHABLE_KEY"))?;
        if key.starts_with("sk_") {
            return Err(ValidationError::SecretKeyInClient);
        }
        if !key.starts_with("pk_") {
            return Err(ValidationError::InvalidPublishableKey);
        }

        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }

    /// Settings for the HTTP adapter; validates first.
    pub fn http_config(&self) -> Result<HttpProviderConfig, ValidationError> {
        self.validate()?;
        let base_url = self
            .base_url
            .as_deref()
            .and_then(parse_http_url)
            .ok_or(ValidationError::InvalidBaseUrl)?;
        let key = self
            .publishable_key
            .clone()
            .ok_or(ValidationError::MissingRequired("PROVIDER__PUBLISHABLE_KEY"))?;
        Ok(HttpProviderConfig::new(base_url, key).with_timeout(self.request_timeout()))
    }
}

pub(super) fn parse_http_url(raw: &str) -> Option<Url> {
    let url = Url::parse(raw).ok()?;
    matches!(url.scheme(), "http" | "https").then_some(url)
}

fn default_request_timeout() -> u64 {
    30
}
