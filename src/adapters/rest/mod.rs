//! Provider REST adapter.
//!
//! Implements the provider ports over the provider's JSON API using
//! `reqwest`. Wire payloads live in `wire`.

mod client;
mod wire;

pub use client::{HttpProvider, HttpProviderConfig, PUBLISHABLE_KEY_HEADER};
