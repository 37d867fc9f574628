//! Read-through cache with stale fallback
//!
//! `CacheManager` keeps one entry per logical resource name. A lookup serves a
//! fresh entry directly; otherwise it calls the producer, stores a successful
//! result, and on failure answers with whatever entry is still held (however
//! old) before giving up and returning the producer's error.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::clock::{Clock, SystemClock};

/// Default time-to-live for cache entries (5 minutes)
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Returned when a cache key would be empty
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cache key must not be empty")]
pub struct EmptyKeyError;

/// Logical resource name an entry is stored under (e.g. "header")
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Creates a key, rejecting the empty string
    pub fn new(key: impl Into<String>) -> Result<Self, EmptyKeyError> {
        let key = key.into();
        if key.is_empty() {
            return Err(EmptyKeyError);
        }
        Ok(Self(key))
    }

    /// Creates a key from a fixed name such as `"header"`
    ///
    /// # Panics
    /// Panics if `name` is empty.
    pub fn named(name: &'static str) -> Self {
        assert!(!name.is_empty(), "cache key names must not be empty");
        Self(name.to_string())
    }

    /// Creates a `{prefix}:{id}` key, used for per-item entries
    ///
    /// The separator keeps the key non-empty even when `id` is.
    pub fn scoped(prefix: &str, id: &str) -> Self {
        Self(format!("{}:{}", prefix, id))
    }

    /// Returns the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored value and the time it was fetched
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    fetched_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    /// An entry is fresh while its age is strictly below `ttl`.
    /// Entries stamped in the future (clock moved backwards) count as fresh.
    fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match (now - self.fetched_at).to_std() {
            Ok(age) => age < ttl,
            Err(_) => true,
        }
    }
}

/// How a lookup was answered
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<V, E> {
    /// A fresh entry was served; the producer was not called
    Hit(V),
    /// The producer succeeded and its value replaced the entry
    Refreshed(V),
    /// The producer failed and the previously stored value was served
    Stale {
        /// Last successfully fetched value
        value: V,
        /// The failure that was masked
        error: E,
    },
}

impl<V, E> Lookup<V, E> {
    /// Returns the served value, dropping any masked error
    pub fn into_value(self) -> V {
        match self {
            Lookup::Hit(value) | Lookup::Refreshed(value) | Lookup::Stale { value, .. } => value,
        }
    }

    /// Borrows the served value
    pub fn value(&self) -> &V {
        match self {
            Lookup::Hit(value) | Lookup::Refreshed(value) | Lookup::Stale { value, .. } => value,
        }
    }

    /// Whether the value came from an expired entry after a failed refresh
    pub fn is_stale(&self) -> bool {
        matches!(self, Lookup::Stale { .. })
    }
}

/// Process-local read-through cache keyed by resource name
///
/// Each instance owns its map, default TTL and clock, so independent caches
/// can coexist and tests do not share state. The map lock is only held for
/// the read or the write, never across the producer's `.await`: two
/// concurrent misses for the same key both call their producer and the last
/// one to finish wins.
pub struct CacheManager<V> {
    entries: RwLock<HashMap<CacheKey, CacheEntry<V>>>,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V> fmt::Debug for CacheManager<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheManager")
            .field("entries", &self.len())
            .field("default_ttl", &self.default_ttl)
            .field("clock", &self.clock)
            .finish()
    }
}

impl<V> Default for CacheManager<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl<V> CacheManager<V> {
    /// Creates an empty cache using the system clock
    pub fn new(default_ttl: Duration) -> Self {
        Self::with_clock(default_ttl, Arc::new(SystemClock))
    }

    /// Creates an empty cache reading time from `clock`
    pub fn with_clock(default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl,
            clock,
        }
    }

    /// TTL applied by `get` and `lookup`
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Number of keys holding an entry
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no entry has been stored yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// When the entry for `key` was last successfully fetched
    pub fn fetched_at(&self, key: &CacheKey) -> Option<DateTime<Utc>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .map(|entry| entry.fetched_at)
    }
}

impl<V: Clone> CacheManager<V> {
    /// Returns the value for `key`, fetching it with `producer` when the
    /// entry is missing or older than the default TTL
    ///
    /// # Returns
    /// * `Ok(V)` - fresh, refreshed, or stale-on-error value
    /// * `Err(E)` - the producer failed and nothing was cached for `key`
    pub async fn get<F, Fut, E>(&self, key: &CacheKey, producer: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        self.get_with_ttl(key, self.default_ttl, producer).await
    }

    /// Same as `get` with an explicit TTL
    pub async fn get_with_ttl<F, Fut, E>(
        &self,
        key: &CacheKey,
        ttl: Duration,
        producer: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        self.lookup_with_ttl(key, ttl, producer)
            .await
            .map(Lookup::into_value)
    }

    /// Like `get`, but reports how the value was obtained so callers can
    /// log a masked failure
    pub async fn lookup<F, Fut, E>(&self, key: &CacheKey, producer: F) -> Result<Lookup<V, E>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        self.lookup_with_ttl(key, self.default_ttl, producer).await
    }

    /// Same as `lookup` with an explicit TTL
    pub async fn lookup_with_ttl<F, Fut, E>(
        &self,
        key: &CacheKey,
        ttl: Duration,
        producer: F,
    ) -> Result<Lookup<V, E>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(entry) = self.read_entry(key) {
            if entry.is_fresh(self.clock.now(), ttl) {
                tracing::debug!(key = %key, "cache hit");
                return Ok(Lookup::Hit(entry.value));
            }
        }

        match producer().await {
            Ok(value) => {
                self.write_entry(key, value.clone());
                tracing::debug!(key = %key, "cache refreshed");
                Ok(Lookup::Refreshed(value))
            }
            Err(error) => match self.read_entry(key) {
                Some(entry) => Ok(Lookup::Stale {
                    value: entry.value,
                    error,
                }),
                None => Err(error),
            },
        }
    }

    fn read_entry(&self, key: &CacheKey) -> Option<CacheEntry<V>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn write_entry(&self, key: &CacheKey, value: V) {
        let entry = CacheEntry {
            value,
            fetched_at: self.clock.now(),
        };
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone(), entry);
    }
}
