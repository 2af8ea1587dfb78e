//! UsageTracker - Checks and records consumption for the signed-in user.

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::{ClientError, SessionContext};
use crate::domain::usage::{TrackOutcome, UsageSnapshot};
use crate::ports::UsageMeter;

/// Result of a tracked event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackReport {
    pub outcome: TrackOutcome,

    /// Usage refetched after an accepted event. `None` when the event was
    /// rejected or the refetch failed.
    pub usage: Option<UsageSnapshot>,
}

/// Reads and records usage through the provider.
///
/// Counts are never adjusted locally; after an accepted event the usage is
/// refetched.
pub struct UsageTracker {
    session: Arc<SessionContext>,
    meter: Arc<dyn UsageMeter>,
}

impl UsageTracker {
    pub fn new(session: Arc<SessionContext>, meter: Arc<dyn UsageMeter>) -> Self {
        Self { session, meter }
    }

    pub async fn check_usage(&self) -> Result<UsageSnapshot, ClientError> {
        self.session.require_ready()?;

        self.meter.check().await.map_err(|e| {
            warn!(error = %e, "Failed to fetch usage");
            ClientError::from(e)
        })
    }

    pub async fn track_event(&self) -> Result<TrackReport, ClientError> {
        self.session.require_ready()?;

        let receipt = self.meter.track().await.map_err(|e| {
            warn!(error = %e, "Failed to track usage");
            ClientError::from(e)
        })?;

        let outcome = TrackOutcome::from_accepted(receipt.accepted);
        if !outcome.is_accepted() {
            info!("Usage event rejected, quota exhausted");
            return Ok(TrackReport {
                outcome,
                usage: None,
            });
        }

        // A failed refetch does not undo the accepted event.
        let usage = self.check_usage().await.ok();
        Ok(TrackReport { outcome, usage })
    }
}
