///! Unauthenticated CelesTrak source
///!
///! Iterates a fixed list of element-set groups over a fixed list of
///! candidate hosts. Per group, the first host returning a non-empty
///! two-line parse wins; a group with no responding host is skipped.
///! Results from all successful groups are concatenated, so objects in
///! overlapping groups appear more than once. That matches what the rest
///! of the pipeline expects and is not deduplicated here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::fetcher::{CatalogSource, SourceError};
use super::tle::parse_two_line;
use super::types::GpRecord;

/// Candidate hostnames, tried in order per group.
const CELESTRAK_HOSTS: &[&str] = &["https://celestrak.org", "https://celestrak.com"];

/// Element-set groups fetched for the "active" catalog, in order.
const CELESTRAK_GROUPS: &[&str] = &["active", "visual", "stations", "science"];

const USER_AGENT: &str = "OrbitAtlas/1.0 (+https://orbitatlas.dev)";

pub struct CelestrakSource {
    client: Client,
}

impl CelestrakSource {
    pub fn new(timeout_secs: u64) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// Fetch one group from one host and parse the TLE body.
    async fn fetch_group_from_host(&self, host: &str, group: &str) -> Result<Vec<GpRecord>, String> {
        let url = format!("{}/NORAD/elements/gp.php?GROUP={}&FORMAT=tle", host, group);

        let response = self
            .client
            .get(&url)
            .header("Pragma", "no-cache")
            .header("Cache-Control", "no-cache")
            .send()
            .await
            .map_err(|e| format!("request to {} failed: {}", url, e))?;

        if !response.status().is_success() {
            return Err(format!("HTTP {} from {}", response.status(), url));
        }

        let body = response
            .text()
            .await
            .map_err(|e| format!("failed to read body from {}: {}", url, e))?;

        let records = parse_two_line(&body);
        if records.is_empty() {
            return Err(format!("no TLE records in response from {}", url));
        }
        Ok(records)
    }
}

#[async_trait]
impl CatalogSource for CelestrakSource {
    fn name(&self) -> &str {
        "celestrak"
    }

    async fn fetch(&self) -> Result<Vec<GpRecord>, SourceError> {
        let mut combined = Vec::new();
        let mut last_error = String::from("no hosts attempted");

        for group in CELESTRAK_GROUPS {
            let mut group_records = None;

            for host in CELESTRAK_HOSTS {
                match self.fetch_group_from_host(host, group).await {
                    Ok(records) => {
                        tracing::debug!(
                            "Group '{}': {} records from {}",
                            group,
                            records.len(),
                            host
                        );
                        group_records = Some(records);
                        break;
                    }
                    Err(e) => {
                        tracing::warn!("Group '{}': {}", group, e);
                        last_error = e;
                    }
                }
            }

            match group_records {
                Some(records) => combined.extend(records),
                None => tracing::warn!("Skipping group '{}': no host responded", group),
            }
        }

        if combined.is_empty() {
            return Err(SourceError::Unavailable(last_error));
        }
        Ok(combined)
    }
}
