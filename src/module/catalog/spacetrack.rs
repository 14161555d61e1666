///! Authenticated Space-Track source
///!
///! Space-Track is quota-limited: one login establishing a session cookie,
///! then exactly one GP query per fetch. The request path uses the JSON
///! format; the out-of-band refresh job uses the 3le text format with the
///! same login/query discipline.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use reqwest::Client;

use super::fetcher::{CatalogSource, SourceError};
use super::tle::parse_three_line;
use super::types::GpRecord;

const SPACE_TRACK_BASE: &str = "https://www.space-track.org";

/// Epoch lower bound for the request-path JSON query.
const JSON_EPOCH_WINDOW_DAYS: i64 = 30;

/// Epoch lower bound for the refresh job's 3le query.
const THREE_LE_EPOCH_WINDOW_DAYS: i64 = 3;

const USER_AGENT: &str = "OrbitAtlas/1.0 (+https://orbitatlas.dev)";

/// Space-Track API client holding credentials and a cookie-carrying
/// HTTP client. The session cookie from `login` authenticates the
/// subsequent query.
pub struct SpaceTrackClient {
    client: Client,
    username: String,
    password: String,
    limit: usize,
}

impl SpaceTrackClient {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        timeout_secs: u64,
        limit: usize,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()
            .context("Failed to build Space-Track HTTP client")?;

        Ok(Self {
            client,
            username: username.into(),
            password: password.into(),
            limit,
        })
    }

    /// Log in once; the session cookie lands in the client's cookie store.
    pub async fn login(&self) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/ajaxauth/login", SPACE_TRACK_BASE))
            .form(&[("identity", self.username.as_str()), ("password", self.password.as_str())])
            .send()
            .await
            .context("Space-Track login request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("Space-Track login failed with status {}", response.status());
        }
        Ok(())
    }

    /// GP query URL for the newest elsets of on-orbit objects.
    fn gp_query_url(&self, window_days: i64, format: &str) -> String {
        let lower_bound = (Utc::now() - ChronoDuration::days(window_days))
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        let epoch_filter = urlencoding::encode(&format!(">{}", lower_bound)).into_owned();

        format!(
            "{}/basicspacedata/query/class/gp/DECAY_DATE/null-val/EPOCH/{}/orderby/NORAD_CAT_ID/format/{}/limit/{}",
            SPACE_TRACK_BASE, epoch_filter, format, self.limit
        )
    }

    /// One JSON query for recent GP elements. Requires a prior `login`.
    pub async fn fetch_gp_json(&self) -> Result<Vec<GpRecord>> {
        let url = self.gp_query_url(JSON_EPOCH_WINDOW_DAYS, "json");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .header("Pragma", "no-cache")
            .header("Cache-Control", "no-cache")
            .send()
            .await
            .context("Space-Track GP query failed")?;

        if !response.status().is_success() {
            anyhow::bail!("Space-Track GP query returned status {}", response.status());
        }

        // serde aliases fold the LINE1/LINE2 key spelling into the
        // canonical TLE_LINE1/TLE_LINE2 fields here.
        let records: Vec<GpRecord> = response
            .json()
            .await
            .context("Failed to parse Space-Track GP JSON")?;

        Ok(records)
    }

    /// One 3le text query for recent GP elements, parsed into records.
    /// Used by the refresh job.
    pub async fn fetch_gp_3le(&self) -> Result<Vec<GpRecord>> {
        let url = self.gp_query_url(THREE_LE_EPOCH_WINDOW_DAYS, "3le");

        let response = self
            .client
            .get(&url)
            .header("Accept", "text/plain")
            .header("Pragma", "no-cache")
            .header("Cache-Control", "no-cache")
            .send()
            .await
            .context("Space-Track 3le query failed")?;

        if !response.status().is_success() {
            anyhow::bail!("Space-Track 3le query returned status {}", response.status());
        }

        let body = response
            .text()
            .await
            .context("Failed to read Space-Track 3le body")?;

        let mut records = parse_three_line(&body);
        records.truncate(self.limit);
        Ok(records)
    }
}

/// Source-chain adapter: login then query, with login failures reported
/// separately so the fallback loop can log them as auth problems.
pub struct SpaceTrackSource {
    client: SpaceTrackClient,
}

impl SpaceTrackSource {
    pub fn new(client: SpaceTrackClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CatalogSource for SpaceTrackSource {
    fn name(&self) -> &str {
        "space-track"
    }

    async fn fetch(&self) -> Result<Vec<GpRecord>, SourceError> {
        self.client
            .login()
            .await
            .map_err(|e| SourceError::AuthFailed(e.to_string()))?;

        let records = self
            .client
            .fetch_gp_json()
            .await
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        if records.is_empty() {
            return Err(SourceError::Unavailable(
                "Space-Track GP query returned no data".to_string(),
            ));
        }
        Ok(records)
    }
}
