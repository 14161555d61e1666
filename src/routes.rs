///! HTTP surface over the catalog pipeline
///!
///! Thin axum handlers: the catalog endpoints return the raw normalized
///! GP records as a JSON array, optionally capped by `?limit=N`. Upstream
///! exhaustion maps to 503 with the last diagnostic in the body.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::module::catalog::{CatalogError, CatalogFetcher, GpRecord};

#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<CatalogFetcher>,
}

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub limit: Option<usize>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/catalog", get(get_catalog))
        .route("/catalog/group/{group}", get(get_catalog_group))
        .route("/countries", get(countries))
        .route("/constellations", get(constellations))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn get_catalog(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Response {
    match state.fetcher.get_active_catalog().await {
        Ok(catalog) => Json(apply_limit(catalog, query.limit)).into_response(),
        Err(e) => unavailable(e),
    }
}

async fn get_catalog_group(
    State(state): State<AppState>,
    Path(group): Path<String>,
    Query(query): Query<CatalogQuery>,
) -> Response {
    match state.fetcher.list_by_group(&group).await {
        Ok(catalog) => Json(apply_limit(catalog, query.limit)).into_response(),
        Err(e) => unavailable(e),
    }
}

/// Static metadata lists consumed by the web frontend's filter widgets.
async fn countries() -> Json<Vec<&'static str>> {
    Json(vec!["US", "RU", "CN", "EU"])
}

async fn constellations() -> Json<Vec<&'static str>> {
    Json(vec!["Starlink", "OneWeb", "GPS", "Galileo"])
}

fn apply_limit(mut catalog: Vec<GpRecord>, limit: Option<usize>) -> Vec<GpRecord> {
    if let Some(limit) = limit {
        catalog.truncate(limit);
    }
    catalog
}

fn unavailable(error: CatalogError) -> Response {
    tracing::error!("Catalog request failed: {}", error);
    (StatusCode::SERVICE_UNAVAILABLE, error.to_string()).into_response()
}
