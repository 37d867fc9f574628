//! Cached access to editorial content
//!
//! `ContentService` puts a `CacheManager` in front of each document type.
//! Failed refreshes are answered from the cache when possible; header and
//! footer fall back to built-in defaults when nothing is cached at all.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, Local};

use super::sanity::{ContentError, SanityClient};
use super::{Footer, Header, Layout, ProductCopy};
use crate::cache::{CacheKey, CacheManager, Clock, Lookup, SystemClock};

/// Loads header, footer and product copy through per-document caches
#[derive(Debug)]
pub struct ContentService {
    client: SanityClient,
    header_key: CacheKey,
    footer_key: CacheKey,
    headers: CacheManager<Option<Header>>,
    footers: CacheManager<Option<Footer>>,
    product_copies: CacheManager<Option<ProductCopy>>,
}

impl ContentService {
    /// Creates a service whose entries live for `ttl`
    pub fn new(client: SanityClient, ttl: Duration) -> Self {
        Self::with_clock(client, ttl, Arc::new(SystemClock))
    }

    /// Creates a service whose caches read time from `clock`
    pub fn with_clock(client: SanityClient, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            client,
            header_key: CacheKey::named("header"),
            footer_key: CacheKey::named("footer"),
            headers: CacheManager::with_clock(ttl, clock.clone()),
            footers: CacheManager::with_clock(ttl, clock.clone()),
            product_copies: CacheManager::with_clock(ttl, clock),
        }
    }

    /// Site header; never fails
    ///
    /// A missing document or an unreachable API with an empty cache yields
    /// `Header::fallback()`, which is not cached so the next call retries.
    pub async fn header(&self) -> Header {
        let lookup = self
            .headers
            .lookup(&self.header_key, || self.client.header())
            .await;

        settle(&self.header_key, lookup).unwrap_or_else(Header::fallback)
    }

    /// Site footer; never fails
    pub async fn footer(&self) -> Footer {
        let lookup = self
            .footers
            .lookup(&self.footer_key, || self.client.footer())
            .await;

        settle(&self.footer_key, lookup)
            .unwrap_or_else(|| Footer::fallback(Local::now().year()))
    }

    /// Header and footer, fetched concurrently
    pub async fn layout(&self) -> Layout {
        let (header, footer) = futures::join!(self.header(), self.footer());
        Layout { header, footer }
    }

    /// Copy for a commerce product
    ///
    /// # Returns
    /// * `Ok(Some(ProductCopy))` - copy exists (possibly served stale)
    /// * `Ok(None)` - no copy document for this product
    /// * `Err(ContentError)` - the API failed and nothing was cached
    pub async fn product_copy(
        &self,
        product_id: &str,
    ) -> Result<Option<ProductCopy>, ContentError> {
        let key = CacheKey::scoped("product_copy", product_id);
        let lookup = self
            .product_copies
            .lookup(&key, || self.client.product_copy(product_id))
            .await?;

        if let Lookup::Stale { error, .. } = &lookup {
            tracing::warn!(key = %key, error = %error, "content API failed, serving cached copy");
        }
        Ok(lookup.into_value())
    }

    /// Number of cached product copy entries
    pub fn cached_product_copies(&self) -> usize {
        self.product_copies.len()
    }
}

/// Unwraps a document lookup, logging masked failures. `None` means the
/// caller should use its fallback document.
fn settle<T>(
    key: &CacheKey,
    lookup: Result<Lookup<Option<T>, ContentError>, ContentError>,
) -> Option<T> {
    match lookup {
        Ok(Lookup::Stale { value, error }) => {
            tracing::warn!(key = %key, error = %error, "content API failed, serving cached copy");
            value
        }
        Ok(found) => found.into_value(),
        Err(error) => {
            tracing::warn!(key = %key, error = %error, "content API failed, serving default copy");
            None
        }
    }
}
