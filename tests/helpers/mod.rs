//! Test helpers for storefront-copy.

#![allow(dead_code)]

pub mod server;

pub use server::{CannedResponse, ContentServer};
