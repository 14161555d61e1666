///! Satellite catalog acquisition and caching pipeline
///!
///! Fresh orbital element sets are pulled from two unreliable upstreams
///! (Space-Track when credentials are configured, CelesTrak otherwise),
///! normalized into one schema and served through a time-bounded Redis
///! cache so callers are insulated from upstream rate limits and outages.
///!
///! ## Main components
///! - `CatalogFetcher`: cache lookup → ordered source fallback → repopulate
///! - `tle`: two-line and three-line element text parsers
///! - `CatalogCache`: best-effort shared cache (Redis in production)
///! - `filter_by_group`: constellation filtering over a fetched catalog

// ============ Core Data Structures ============
mod types;
pub use types::{GpRecord, NoradId};

// ============ TLE Parsing ============
pub mod tle;
pub use tle::{norad_id_from_line1, parse_three_line, parse_two_line};

// ============ Cache Layer ============
mod cache;
pub use cache::{CatalogCache, RedisCatalogCache, ACTIVE_CATALOG_KEY, ACTIVE_CATALOG_TTL_SECS};

// ============ Upstream Sources ============
mod celestrak;
mod spacetrack;
pub use celestrak::CelestrakSource;
pub use spacetrack::{SpaceTrackClient, SpaceTrackSource};

// ============ Fetch Orchestration ============
mod fetcher;
pub use fetcher::{CatalogError, CatalogFetcher, CatalogSource, SourceError};

// ============ Group Filtering ============
mod groups;
pub use groups::filter_by_group;
