//! Entry handlers.
//!
//! ## Commands
//! - Deciding where "get started" sends a visitor

mod plan_entry;

pub use plan_entry::{EntryDecision, PlanEntry};
