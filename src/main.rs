use std::sync::Arc;

use anyhow::Result;

use orbit_backend::config;
use orbit_backend::module::catalog::{
    CatalogFetcher, CatalogSource, CelestrakSource, RedisCatalogCache, SpaceTrackClient,
    SpaceTrackSource,
};
use orbit_backend::routes::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    config::read_config()?;
    let config = config::CONFIG.get().unwrap();

    // Initialize logging
    let _logging_guard =
        orbit_backend::logging::init_logging("logs", "orbit-backend", &config.log_level);

    tracing::info!("Orbit backend starting...");

    // Cache client is built once at startup and handed to the fetcher;
    // command failures after this point fall under the best-effort contract.
    let cache = Arc::new(RedisCatalogCache::connect(&config.redis_url).await?);

    // Source preference order: Space-Track when credentials are configured,
    // CelesTrak always as the fallback.
    let mut sources: Vec<Box<dyn CatalogSource>> = Vec::new();
    if config.has_space_track_credentials() {
        let client = SpaceTrackClient::new(
            &config.space_track_username,
            &config.space_track_password,
            config.space_track_timeout_secs,
            config.space_track_limit,
        )?;
        sources.push(Box::new(SpaceTrackSource::new(client)));
        tracing::info!("Space-Track credentials configured, authenticated source enabled");
    } else {
        tracing::info!("No Space-Track credentials, using CelesTrak only");
    }
    sources.push(Box::new(CelestrakSource::new(config.celestrak_timeout_secs)?));

    let fetcher = Arc::new(CatalogFetcher::new(cache, sources));
    let app = build_router(AppState { fetcher });

    let addr = config.server_address();
    tracing::info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
