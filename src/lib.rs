//! Plan Gate - Session, entitlement and billing-redirect orchestration
//!
//! This crate drives a hosted identity/billing provider from the client
//! side: session readiness, the purchasable tier catalog, quota metering,
//! checkout and billing-portal redirects, and reconciliation after the
//! browser returns from checkout.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
