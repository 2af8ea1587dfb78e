//! Usage meter port for quota checks and consumption events.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ProviderError;
use crate::domain::usage::UsageSnapshot;

/// Provider answer to a tracked event.
///
/// `accepted == false` means the quota is exhausted; it is an answer, not a
/// transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackReceipt {
    pub accepted: bool,
}

impl TrackReceipt {
    pub fn accepted() -> Self {
        Self { accepted: true }
    }

    pub fn rejected() -> Self {
        Self { accepted: false }
    }
}

/// Reads and records consumption for the signed-in user.
#[async_trait]
pub trait UsageMeter: Send + Sync {
    /// Current usage against the plan's limit.
    async fn check(&self) -> Result<UsageSnapshot, ProviderError>;

    /// Records one consumption event.
    async fn track(&self) -> Result<TrackReceipt, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_constructors() {
        assert!(TrackReceipt::accepted().accepted);
        assert!(!TrackReceipt::rejected().accepted);
    }

    #[test]
    fn usage_meter_is_object_safe() {
        fn _accepts_dyn(_meter: &dyn UsageMeter) {}
    }
}
