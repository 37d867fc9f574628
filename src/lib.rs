//! Storefront Copy Library
//!
//! Editorial storefront copy served from a headless content API through a
//! stale-tolerant TTL cache. Modules are exposed for the binary and for
//! integration tests.

pub mod cache;
pub mod cli;
pub mod config;
pub mod content;
pub mod refresh;
