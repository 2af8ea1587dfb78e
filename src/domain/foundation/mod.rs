//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, the state machine trait and validation errors
//! shared by the session, catalog, usage and checkout domains.

mod allowance;
mod errors;
mod ids;
mod state_machine;

pub use allowance::Allowance;
pub use errors::ValidationError;
pub use ids::{PlanName, UserId};
pub use state_machine::StateMachine;
