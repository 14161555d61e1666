///! Catalog fetcher - cache lookup, ordered source fallback, repopulation
///!
///! One canonical fetch path parameterized by an ordered list of source
///! strategies: the authenticated Space-Track client first when credentials
///! are configured, the unauthenticated CelesTrak chain always last.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use super::cache::{CatalogCache, ACTIVE_CATALOG_KEY, ACTIVE_CATALOG_TTL_SECS};
use super::groups::filter_by_group;
use super::types::GpRecord;

/// Outcome of a single source attempt. Both variants are non-fatal and
/// fold into the fallback chain.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Login to an authenticated source was rejected; skip to the next source.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// Timeout, non-200, connection error, or empty result.
    #[error("{0}")]
    Unavailable(String),
}

/// Fatal request-level failure.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Every configured source, host and group was exhausted.
    #[error("all catalog sources exhausted: {0}")]
    UpstreamUnavailable(String),
}

/// One upstream catalog source in the fallback chain.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Human-readable source name for logs and diagnostics.
    fn name(&self) -> &str;

    /// Fetch the full catalog from this source.
    async fn fetch(&self) -> Result<Vec<GpRecord>, SourceError>;
}

/// Fetches the active satellite catalog through a shared cache with
/// ordered multi-source fallback.
pub struct CatalogFetcher {
    cache: Arc<dyn CatalogCache>,
    sources: Vec<Box<dyn CatalogSource>>,
}

impl CatalogFetcher {
    pub fn new(cache: Arc<dyn CatalogCache>, sources: Vec<Box<dyn CatalogSource>>) -> Self {
        Self { cache, sources }
    }

    /// Return the freshest catalog available.
    ///
    /// Cache hit: returned as-is, zero network calls. Cache miss (or a
    /// corrupt/empty payload): sources are tried in order and the first
    /// non-empty result wins, is written back to the cache (write failure
    /// ignored) and returned. Only when every source fails does this
    /// surface [`CatalogError::UpstreamUnavailable`].
    pub async fn get_active_catalog(&self) -> Result<Vec<GpRecord>, CatalogError> {
        if let Some(cached) = self.load_from_cache().await {
            return Ok(cached);
        }

        let mut last_error = String::from("no catalog sources configured");

        for source in &self.sources {
            match source.fetch().await {
                Ok(records) if !records.is_empty() => {
                    tracing::info!(
                        "Fetched {} catalog entries from {}",
                        records.len(),
                        source.name()
                    );
                    self.store_in_cache(&records).await;
                    return Ok(records);
                }
                Ok(_) => {
                    last_error = format!("{} returned no records", source.name());
                    tracing::warn!("{}", last_error);
                }
                Err(e) => {
                    last_error = format!("{}: {}", source.name(), e);
                    tracing::warn!("Catalog source failed, falling through: {}", last_error);
                }
            }
        }

        Err(CatalogError::UpstreamUnavailable(last_error))
    }

    /// Catalog restricted to one constellation group.
    pub async fn list_by_group(&self, group: &str) -> Result<Vec<GpRecord>, CatalogError> {
        let catalog = self.get_active_catalog().await?;
        Ok(filter_by_group(catalog, group))
    }

    /// Cache read; a present-but-undeserializable or empty payload counts
    /// as a miss so a corrupt blob never reaches the caller.
    async fn load_from_cache(&self) -> Option<Vec<GpRecord>> {
        let raw = self.cache.get(ACTIVE_CATALOG_KEY).await?;

        match serde_json::from_str::<Vec<GpRecord>>(&raw) {
            Ok(records) if !records.is_empty() => {
                tracing::debug!("Catalog cache hit: {} entries", records.len());
                Some(records)
            }
            Ok(_) => {
                tracing::warn!("Catalog cache held an empty list, refetching");
                None
            }
            Err(e) => {
                tracing::warn!("Catalog cache payload corrupt, refetching: {}", e);
                None
            }
        }
    }

    async fn store_in_cache(&self, records: &[GpRecord]) {
        match serde_json::to_string(records) {
            Ok(payload) => {
                self.cache
                    .set(ACTIVE_CATALOG_KEY, &payload, ACTIVE_CATALOG_TTL_SECS)
                    .await;
            }
            Err(e) => {
                tracing::warn!("Failed to serialize catalog for caching (ignored): {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory stand-in for Redis (TTL ignored).
    #[derive(Default)]
    struct MemoryCache {
        entries: Mutex<HashMap<String, String>>,
    }

    #[async_trait]
    impl CatalogCache for MemoryCache {
        async fn get(&self, key: &str) -> Option<String> {
            self.entries.lock().unwrap().get(key).cloned()
        }

        async fn set(&self, key: &str, value: &str, _ttl_secs: u64) {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
        }
    }

    struct StubSource {
        name: &'static str,
        result: Result<Vec<GpRecord>, SourceError>,
        calls: Arc<AtomicUsize>,
    }

    impl StubSource {
        fn new(
            name: &'static str,
            result: Result<Vec<GpRecord>, SourceError>,
        ) -> (Box<dyn CatalogSource>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let source = Box::new(Self {
                name,
                result,
                calls: calls.clone(),
            });
            (source, calls)
        }
    }

    #[async_trait]
    impl CatalogSource for StubSource {
        fn name(&self) -> &str {
            self.name
        }

        async fn fetch(&self) -> Result<Vec<GpRecord>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.result {
                Ok(records) => Ok(records.clone()),
                Err(SourceError::AuthFailed(msg)) => Err(SourceError::AuthFailed(msg.clone())),
                Err(SourceError::Unavailable(msg)) => Err(SourceError::Unavailable(msg.clone())),
            }
        }
    }

    fn record(name: &str, norad_id: u32) -> GpRecord {
        GpRecord {
            name: name.to_string(),
            norad_id,
            line1: format!("1 {}U 98067A   24001.0", norad_id),
            line2: format!("2 {}  51.6424", norad_id),
            epoch: None,
        }
    }

    #[tokio::test]
    async fn test_cache_hit_makes_no_source_calls() {
        let cache = Arc::new(MemoryCache::default());
        let catalog = vec![record("ISS (ZARYA)", 25544)];
        cache
            .set(
                ACTIVE_CATALOG_KEY,
                &serde_json::to_string(&catalog).unwrap(),
                ACTIVE_CATALOG_TTL_SECS,
            )
            .await;

        let (source, calls) = StubSource::new("stub", Ok(vec![record("OTHER", 1)]));
        let fetcher = CatalogFetcher::new(cache, vec![source]);

        let result = fetcher.get_active_catalog().await.unwrap();
        assert_eq!(result, catalog);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_corrupt_cache_falls_through_to_sources() {
        let cache = Arc::new(MemoryCache::default());
        cache.set(ACTIVE_CATALOG_KEY, "{not json", 7200).await;

        let live = vec![record("ISS (ZARYA)", 25544)];
        let (source, calls) = StubSource::new("stub", Ok(live.clone()));
        let fetcher = CatalogFetcher::new(cache, vec![source]);

        let result = fetcher.get_active_catalog().await.unwrap();
        assert_eq!(result, live);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_cache_payload_is_a_miss() {
        let cache = Arc::new(MemoryCache::default());
        cache.set(ACTIVE_CATALOG_KEY, "[]", 7200).await;

        let live = vec![record("ISS (ZARYA)", 25544)];
        let (source, _) = StubSource::new("stub", Ok(live.clone()));
        let fetcher = CatalogFetcher::new(cache, vec![source]);

        let result = fetcher.get_active_catalog().await.unwrap();
        assert_eq!(result, live);
    }

    #[tokio::test]
    async fn test_successful_fetch_repopulates_cache() {
        let cache = Arc::new(MemoryCache::default());
        let live = vec![record("ISS (ZARYA)", 25544)];
        let (source, _) = StubSource::new("stub", Ok(live.clone()));
        let fetcher = CatalogFetcher::new(cache.clone(), vec![source]);

        fetcher.get_active_catalog().await.unwrap();

        let payload = cache.get(ACTIVE_CATALOG_KEY).await.unwrap();
        let stored: Vec<GpRecord> = serde_json::from_str(&payload).unwrap();
        assert_eq!(stored, live);
    }

    #[tokio::test]
    async fn test_auth_failure_falls_through_to_next_source() {
        let cache = Arc::new(MemoryCache::default());
        let (auth, auth_calls) = StubSource::new(
            "space-track",
            Err(SourceError::AuthFailed("login rejected".to_string())),
        );
        let live = vec![record("ISS (ZARYA)", 25544)];
        let (fallback, fallback_calls) = StubSource::new("celestrak", Ok(live.clone()));

        let fetcher = CatalogFetcher::new(cache, vec![auth, fallback]);
        let result = fetcher.get_active_catalog().await.unwrap();

        assert_eq!(result, live);
        assert_eq!(auth_calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_all_sources_exhausted_is_fatal_with_last_message() {
        let cache = Arc::new(MemoryCache::default());
        let (first, _) = StubSource::new(
            "space-track",
            Err(SourceError::AuthFailed("login rejected".to_string())),
        );
        let (second, _) = StubSource::new(
            "celestrak",
            Err(SourceError::Unavailable("all hosts timed out".to_string())),
        );

        let fetcher = CatalogFetcher::new(cache, vec![first, second]);
        let err = fetcher.get_active_catalog().await.unwrap_err();

        let CatalogError::UpstreamUnavailable(msg) = err;
        assert!(msg.contains("celestrak"));
        assert!(msg.contains("all hosts timed out"));
    }

    #[tokio::test]
    async fn test_empty_source_result_never_becomes_success() {
        let cache = Arc::new(MemoryCache::default());
        let (source, _) = StubSource::new("stub", Ok(Vec::new()));
        let fetcher = CatalogFetcher::new(cache, vec![source]);

        assert!(fetcher.get_active_catalog().await.is_err());
    }

    #[tokio::test]
    async fn test_list_by_group_filters_catalog() {
        let cache = Arc::new(MemoryCache::default());
        let live = vec![record("NAVSTAR 81 (USA 319)", 48859), record("IRIDIUM 106", 41917)];
        let (source, _) = StubSource::new("stub", Ok(live));
        let fetcher = CatalogFetcher::new(cache, vec![source]);

        let gps = fetcher.list_by_group("GPS").await.unwrap();
        assert_eq!(gps.len(), 1);
        assert_eq!(gps[0].norad_id, 48859);
    }
}
