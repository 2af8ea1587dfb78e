//! Post-checkout reconciliation timing

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::ReconcilePolicy;

/// Reconciliation timing, in milliseconds.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconcileConfig {
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,

    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_indicator_clear")]
    pub indicator_clear_ms: u64,
}

impl ReconcileConfig {
    pub fn policy(&self) -> ReconcilePolicy {
        ReconcilePolicy::default()
            .with_settle_delay(Duration::from_millis(self.settle_delay_ms))
            .with_poll_interval(Duration::from_millis(self.poll_interval_ms))
            .with_max_attempts(self.max_attempts)
            .with_indicator_clear(Duration::from_millis(self.indicator_clear_ms))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_attempts == 0 {
            return Err(ValidationError::InvalidMaxAttempts);
        }
        Ok(())
    }
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay(),
            poll_interval_ms: default_poll_interval(),
            max_attempts: default_max_attempts(),
            indicator_clear_ms: default_indicator_clear(),
        }
    }
}

fn default_settle_delay() -> u64 {
    1500
}

fn default_poll_interval() -> u64 {
    1000
}

fn default_max_attempts() -> u32 {
    5
}

fn default_indicator_clear() -> u64 {
    1500
}
