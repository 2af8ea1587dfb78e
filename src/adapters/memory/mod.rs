//! In-memory adapters for offline hosts and tests.

mod mock_provider;
mod navigator;

pub use mock_provider::{MethodCall, MockProvider};
pub use navigator::{MemoryNavigator, NavigationEvent};
