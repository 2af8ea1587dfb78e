//! Checkout domain module.
//!
//! - `status` - per-selection state machine used by the plan picker
//! - `return_marker` - success/cancel URL markers and their scrubbing

pub mod return_marker;
mod status;

pub use return_marker::ReturnMarker;
pub use status::{CheckoutPhase, CheckoutStatus};
