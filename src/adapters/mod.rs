//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the client to external systems:
//! - `rest` - The provider's JSON API over `reqwest`
//! - `memory` - Scripted provider and in-memory navigator

pub mod memory;
pub mod rest;

pub use memory::{MemoryNavigator, MockProvider, NavigationEvent};
pub use rest::{HttpProvider, HttpProviderConfig};
