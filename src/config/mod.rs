//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `PLAN_GATE` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use plan_gate::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Provider at {:?}", config.provider.base_url);
//! ```

mod error;
mod provider;
mod reconcile;
mod routes;
mod telemetry;

pub use error::{ConfigError, ValidationError};
pub use provider::ProviderConfig;
pub use reconcile::ReconcileConfig;
pub use routes::RoutesConfig;
pub use telemetry::TelemetryConfig;

use serde::Deserialize;

use crate::application::ClientSettings;

/// Root client configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Provider API location and publishable key
    #[serde(default)]
    pub provider: ProviderConfig,

    /// App origin and in-app paths
    #[serde(default)]
    pub routes: RoutesConfig,

    /// Post-checkout reconciliation timing
    #[serde(default)]
    pub reconcile: ReconcileConfig,

    /// Log filter and format
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `PLAN_GATE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `PLAN_GATE__PROVIDER__BASE_URL=...` -> `provider.base_url = ...`
    /// - `PLAN_GATE__RECONCILE__MAX_ATTEMPTS=3` -> `reconcile.max_attempts = 3`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    /// Missing required values surface later from [`AppConfig::validate`].
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PLAN_GATE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.provider.validate()?;
        self.routes.validate()?;
        self.reconcile.validate()?;
        self.telemetry.validate()?;
        Ok(())
    }

    /// Route and reconcile settings for the client.
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            routes: self.routes.paths(),
            reconcile: self.reconcile.policy(),
        }
    }
}
