//! Session domain module.
//!
//! - `state` - readiness, sign-in flag and user snapshot
//! - `route` - protected-page gating derived from the state

mod route;
mod state;

pub use route::RouteDecision;
pub use state::{SessionState, UserSnapshot};
