//! Usage domain module.
//!
//! - `snapshot` - provider-reported consumption and quota
//! - `outcome` - accepted vs quota-exhausted result of a tracked event

mod outcome;
mod snapshot;

pub use outcome::TrackOutcome;
pub use snapshot::UsageSnapshot;
