//! End-to-end cache behaviour through the public API
//!
//! Time is driven by `ManualClock`, so "t=1500ms" means the clock was
//! advanced to 1500ms after the first fetch.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use storefront_copy::cache::{CacheKey, CacheManager, Lookup, ManualClock};

#[derive(Debug, Clone, PartialEq)]
struct Unavailable;

fn cache_with_clock(ttl_ms: u64) -> (CacheManager<String>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::default());
    let cache = CacheManager::with_clock(Duration::from_millis(ttl_ms), clock.clone());
    (cache, clock)
}

#[tokio::test]
async fn test_fresh_refresh_then_stale_timeline() {
    let (cache, clock) = cache_with_clock(1000);
    let key = CacheKey::new("header").unwrap();
    let counter = AtomicUsize::new(0);
    let calls = &counter;

    // t=0: miss, producer returns "A"
    let value = cache
        .get(&key, || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, Unavailable>("A".to_string())
        })
        .await;
    assert_eq!(value, Ok("A".to_string()));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // t=500: fresh, producer untouched
    clock.advance(Duration::from_millis(500));
    let value = cache
        .get(&key, || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, Unavailable>("unused".to_string())
        })
        .await;
    assert_eq!(value, Ok("A".to_string()));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // t=1500: expired, producer returns "B"
    clock.advance(Duration::from_millis(1000));
    let value = cache
        .get(&key, || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, Unavailable>("B".to_string())
        })
        .await;
    assert_eq!(value, Ok("B".to_string()));
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    // t=3000: expired again, producer fails, stale "B" served
    clock.advance(Duration::from_millis(1500));
    let lookup = cache
        .lookup(&key, || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<String, _>(Unavailable)
        })
        .await;
    assert_eq!(
        lookup,
        Ok(Lookup::Stale {
            value: "B".to_string(),
            error: Unavailable,
        })
    );
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_failure_on_empty_cache_reaches_caller() {
    let (cache, _clock) = cache_with_clock(1000);
    let key = CacheKey::new("footer").unwrap();

    let result = cache.get(&key, || async { Err::<String, _>(Unavailable) }).await;

    assert_eq!(result, Err(Unavailable));
}

#[tokio::test]
async fn test_instances_do_not_share_entries() {
    let (first, _) = cache_with_clock(1000);
    let (second, _) = cache_with_clock(1000);
    let key = CacheKey::new("header").unwrap();

    first
        .get(&key, || async { Ok::<_, Unavailable>("A".to_string()) })
        .await
        .unwrap();

    let result = second.get(&key, || async { Err::<String, _>(Unavailable) }).await;
    assert_eq!(result, Err(Unavailable));
    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
}

#[tokio::test]
async fn test_concurrent_misses_both_fetch_and_last_write_wins() {
    let (cache, _clock) = cache_with_clock(1000);
    let cache = Arc::new(cache);
    let key = CacheKey::new("header").unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let (release_slow, slow_released) = tokio::sync::oneshot::channel::<()>();

    let slow = {
        let cache = cache.clone();
        let key = key.clone();
        let calls = calls.clone();
        tokio::spawn(async move {
            cache
                .get(&key, || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    let _ = slow_released.await;
                    Ok::<_, Unavailable>("slow".to_string())
                })
                .await
        })
    };

    // Let the slow fetch start before the fast one misses as well
    while calls.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }

    let fast_calls = calls.clone();
    let fast = cache
        .get(&key, || async move {
            fast_calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, Unavailable>("fast".to_string())
        })
        .await;
    assert_eq!(fast, Ok("fast".to_string()));

    release_slow.send(()).unwrap();
    assert_eq!(slow.await.unwrap(), Ok("slow".to_string()));

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    let latest = cache
        .get(&key, || async { Err::<String, _>(Unavailable) })
        .await;
    assert_eq!(latest, Ok("slow".to_string()));
}
