///! Out-of-band Space-Track cache refresh job
///!
///! Run from cron at most once per hour, at an off-peak minute (e.g.
///! HH:17), per Space-Track's API policy. Logs in once, issues a single
///! 3le GP query, parses it and writes the catalog into the same Redis
///! key the API serves from. The API then picks up authenticated-source
///! data via pure cache hits without holding credentials itself.

use anyhow::Result;

use orbit_backend::config;
use orbit_backend::module::catalog::{
    CatalogCache, RedisCatalogCache, SpaceTrackClient, ACTIVE_CATALOG_KEY,
    ACTIVE_CATALOG_TTL_SECS,
};

#[tokio::main]
async fn main() -> Result<()> {
    config::read_config()?;
    let config = config::CONFIG.get().unwrap();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    if !config.has_space_track_credentials() {
        anyhow::bail!("SPACE_TRACK_USERNAME / SPACE_TRACK_PASSWORD not set");
    }

    tracing::info!(
        "Fetching up to {} satellites from Space-Track /class/gp...",
        config.space_track_limit
    );

    let client = SpaceTrackClient::new(
        &config.space_track_username,
        &config.space_track_password,
        config.space_track_timeout_secs,
        config.space_track_limit,
    )?;

    client.login().await?;
    let catalog = client.fetch_gp_3le().await?;
    if catalog.is_empty() {
        anyhow::bail!("Space-Track GP query returned no data");
    }
    tracing::info!("Fetched {} satellites from Space-Track", catalog.len());

    // This job exists only to populate the cache, so unlike the request
    // path a write failure here must be visible: read the key back and
    // fail the run when the payload did not land.
    let cache = RedisCatalogCache::connect(&config.redis_url).await?;
    let payload = serde_json::to_string(&catalog)?;
    cache
        .set(ACTIVE_CATALOG_KEY, &payload, ACTIVE_CATALOG_TTL_SECS)
        .await;

    if cache.get(ACTIVE_CATALOG_KEY).await.as_deref() != Some(payload.as_str()) {
        anyhow::bail!("Cache write verification failed for '{}'", ACTIVE_CATALOG_KEY);
    }

    tracing::info!(
        "Wrote catalog to Redis key '{}' (TTL={}s)",
        ACTIVE_CATALOG_KEY,
        ACTIVE_CATALOG_TTL_SECS
    );
    Ok(())
}
