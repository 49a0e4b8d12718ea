use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use moka::future::Cache;
use tracing::{debug, info};

use crate::catalog::FlightCatalog;
use crate::error::FetchError;
use crate::feed_source::FeedSource;

/// A built catalog and when its payload was fetched
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub catalog: Arc<FlightCatalog>,
    pub fetched_at: DateTime<Utc>,
}

/// Single-flight catalog cache in front of a `FeedSource`
///
/// There is one global feed, so the cache holds at most one entry. Concurrent
/// misses share one fetch; failed fetches are not cached. A zero TTL disables
/// caching and every call fetches.
#[derive(Clone)]
pub struct CatalogCache {
    source: Arc<dyn FeedSource>,
    ttl: Duration,
    cache: Cache<(), Snapshot>,
}

impl CatalogCache {
    pub fn new(source: Arc<dyn FeedSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            cache: Cache::builder()
                .max_capacity(1)
                .time_to_live(ttl.max(Duration::from_millis(1)))
                .build(),
        }
    }

    /// Current snapshot, fetching and building one if none is fresh
    pub async fn snapshot(&self) -> Result<Snapshot, FetchError> {
        if self.ttl.is_zero() {
            return load(self.source.as_ref()).await;
        }

        let start = Instant::now();
        let entry = self
            .cache
            .entry(())
            .or_try_insert_with(load(self.source.as_ref()))
            .await
            .map_err(|e: Arc<FetchError>| (*e).clone())?;

        if entry.is_fresh() {
            metrics::counter!("feed.cache.miss").increment(1);
        } else {
            metrics::counter!("feed.cache.hit").increment(1);
            debug!("Serving cached catalog");
        }
        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
        metrics::histogram!("feed.cache.lookup_ms").record(duration_ms);

        Ok(entry.into_value())
    }

}

async fn load(source: &dyn FeedSource) -> Result<Snapshot, FetchError> {
    let payload = source.fetch().await?;
    let fetched_at = Utc::now();
    let catalog = FlightCatalog::build(&payload);
    info!(
        "Loaded timetable from {} ({} flights)",
        source.describe(),
        catalog.len()
    );
    Ok(Snapshot {
        catalog: Arc::new(catalog),
        fetched_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed_xml::RawFeedPayload;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
        fail: bool,
        delay: Duration,
    }

    impl CountingSource {
        fn new(fail: bool, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail,
                delay,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl FeedSource for CountingSource {
        async fn fetch(&self) -> Result<RawFeedPayload, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if self.fail {
                return Err(FetchError::Transport("connection reset".to_string()));
            }
            Ok(json!({"FLIGHT_TYPE": {"FLIGHT": {
                "CARRIER": "HY", "FLIGHT_NO": "305", "LEG": {"ORIGIN_IATA": "TAS"}
            }}}))
        }

        fn describe(&self) -> String {
            "counting".to_string()
        }
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_one_fetch() {
        let source = CountingSource::new(false, Duration::from_millis(50));
        let cache = CatalogCache::new(source.clone(), Duration::from_secs(60));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.snapshot().await })
            })
            .collect();

        for handle in handles {
            let snapshot = handle.await.unwrap().unwrap();
            assert_eq!(snapshot.catalog.len(), 1);
        }
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_hit_within_ttl() {
        let source = CountingSource::new(false, Duration::ZERO);
        let cache = CatalogCache::new(source.clone(), Duration::from_secs(60));

        let first = cache.snapshot().await.unwrap();
        let second = cache.snapshot().await.unwrap();
        assert!(Arc::ptr_eq(&first.catalog, &second.catalog));
        assert_eq!(first.fetched_at, second.fetched_at);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let source = CountingSource::new(true, Duration::ZERO);
        let cache = CatalogCache::new(source.clone(), Duration::from_secs(60));

        assert!(matches!(
            cache.snapshot().await,
            Err(FetchError::Transport(_))
        ));
        assert!(cache.snapshot().await.is_err());
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_zero_ttl_fetches_every_time() {
        let source = CountingSource::new(false, Duration::ZERO);
        let cache = CatalogCache::new(source.clone(), Duration::ZERO);

        cache.snapshot().await.unwrap();
        cache.snapshot().await.unwrap();
        assert_eq!(source.calls(), 2);
    }
}
