//! In-memory read-through cache for editorial content
//!
//! This module provides a `CacheManager` that wraps asynchronous fetches with
//! a time-to-live. Fresh entries are served without calling the producer, and
//! expired entries are kept around so a failed refresh can still be answered
//! with the last good value.

mod clock;
mod manager;

pub use clock::{Clock, ManualClock, SystemClock};
pub use manager::{CacheKey, CacheManager, EmptyKeyError, Lookup, DEFAULT_TTL};
