//! Usage handlers.
//!
//! ## Queries
//! - Checking current usage against the plan's quota
//!
//! ## Commands
//! - Tracking one consumption event

mod usage_tracker;

pub use usage_tracker::{TrackReport, UsageTracker};
