//! Domain layer containing the client's state types and rules.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, allowance, state machine, errors)
//! - `session` - Readiness, sign-in state and protected-page gating
//! - `catalog` - Purchasable tiers and popular-tier inference
//! - `usage` - Quota snapshots and tracked-event outcomes
//! - `checkout` - Selection state machine and return-URL markers

pub mod catalog;
pub mod checkout;
pub mod foundation;
pub mod session;
pub mod usage;
