///! Shared catalog cache backed by Redis
///!
///! Reads and writes are best-effort: the cache insulates the API from
///! upstream outages, so the cache itself must never take a request down.
///! A backend error on `get` is a miss; an error on `set` is swallowed.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

/// Key holding the serialized "active satellites" catalog blob.
///
/// Written by both the request path and the out-of-band refresh job;
/// last writer wins, which is fine because catalogs from the same time
/// window are interchangeable.
pub const ACTIVE_CATALOG_KEY: &str = "satellites:catalog:active";

/// Catalog TTL: 2 hours.
pub const ACTIVE_CATALOG_TTL_SECS: u64 = 2 * 60 * 60;

/// Best-effort string cache with expiry.
#[async_trait]
pub trait CatalogCache: Send + Sync {
    /// Fetch a value; backend errors are logged and reported as a miss.
    async fn get(&self, key: &str) -> Option<String>;

    /// Store a value with a TTL; backend errors are logged and swallowed.
    async fn set(&self, key: &str, value: &str, ttl_secs: u64);
}

/// Redis-backed implementation used in production.
#[derive(Clone)]
pub struct RedisCatalogCache {
    conn: ConnectionManager,
}

impl RedisCatalogCache {
    /// Connect to Redis and build a managed connection.
    ///
    /// Connection failure at startup is a hard error; once connected the
    /// manager reconnects on its own and individual command failures fall
    /// under the best-effort contract.
    pub async fn connect(redis_url: &str) -> anyhow::Result<Self> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        tracing::info!("Connected to Redis at {}", redis_url);
        Ok(Self { conn })
    }
}

#[async_trait]
impl CatalogCache for RedisCatalogCache {
    async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Cache read failed for '{}', treating as miss: {}", key, e);
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: u64) {
        let mut conn = self.conn.clone();
        if let Err(e) = conn.set_ex::<_, _, ()>(key, value, ttl_secs).await {
            tracing::warn!("Cache write failed for '{}' (ignored): {}", key, e);
        }
    }
}
