//! Result of recording a consumption event.

use serde::{Deserialize, Serialize};

/// What the provider did with a tracked event.
///
/// `QuotaExhausted` is an ordinary answer, not a failure: transport and
/// provider errors travel separately as `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackOutcome {
    Accepted,
    QuotaExhausted,
}

impl TrackOutcome {
    /// Maps the provider's `accepted` flag.
    pub fn from_accepted(accepted: bool) -> Self {
        if accepted {
            TrackOutcome::Accepted
        } else {
            TrackOutcome::QuotaExhausted
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, TrackOutcome::Accepted)
    }
}
