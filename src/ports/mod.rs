//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the client's components and the outside world. Adapters implement these
//! ports.
//!
//! ## Provider Ports
//!
//! - `AuthProvider` - Initialization, sign-out, user refresh, hosted auth URLs
//! - `ProductCatalog` - Purchasable tiers
//! - `UsageMeter` - Quota checks and consumption events
//! - `BillingProvider` - Hosted checkout and billing portal sessions
//!
//! ## Host Ports
//!
//! - `Navigator` - Current URL, redirects, in-app navigation, history rewrite

mod auth_provider;
mod billing_provider;
mod navigator;
mod product_catalog;
mod provider_error;
mod usage_meter;

pub use auth_provider::{AuthProvider, AuthStatus};
pub use billing_provider::{BillingProvider, CheckoutRequest, CheckoutSession, PortalSession};
pub use navigator::Navigator;
pub use product_catalog::ProductCatalog;
pub use provider_error::{ProviderError, ProviderErrorCode};
pub use usage_meter::{TrackReceipt, UsageMeter};
