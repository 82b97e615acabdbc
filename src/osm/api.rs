//! OSM API 0.6 client.
//!
//! Read-only JSON endpoints:
//! - `GET {base}/node/{id}.json`
//! - `GET {base}/{way|relation}/{id}/full.json`
//! - `GET {base}/{type}/{id}/relations.json`
//! - `GET {base}/changeset/{id}.json`

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;

use super::source::{FetchError, OsmSource};
use super::types::{
    Changeset, ChangesetResponse, ElementsResponse, EntityRef, EntityType, WireElement,
};

pub const DEFAULT_OSM_API_BASE_URL: &str = "https://api.openstreetmap.org/api/0.6";
pub const DEFAULT_USER_AGENT: &str = concat!("trailview/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

pub struct OsmApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl OsmApiClient {
    pub fn new(base_url: Option<String>) -> Self {
        Self::with_options(base_url, DEFAULT_USER_AGENT, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_options(base_url: Option<String>, user_agent: &str, timeout_secs: u64) -> Self {
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_OSM_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build configured HTTP client ({}), using defaults", e);
                reqwest::Client::new()
            });

        info!("OSM API client: base_url={}", base_url);
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Nodes have no `full` form; ways and relations are always fetched
    /// with everything they reference.
    fn entity_url(&self, entity: EntityRef) -> String {
        if entity.kind != EntityType::Node {
            format!("{}/{}/full.json", self.base_url, entity)
        } else {
            format!("{}/{}.json", self.base_url, entity)
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND || status == reqwest::StatusCode::GONE {
            debug!("{} -> {}", url, status);
            return Err(FetchError::NotFound);
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("OSM API error: {} - {}", status, message);
            return Err(FetchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| FetchError::Parse(e.to_string()))
    }
}

#[async_trait]
impl OsmSource for OsmApiClient {
    fn name(&self) -> &str {
        "osm-api"
    }

    async fn fetch_elements(&self, entity: EntityRef) -> Result<Vec<WireElement>, FetchError> {
        let url = self.entity_url(entity);
        let response: ElementsResponse = self.get_json(&url).await?;
        Ok(response.elements)
    }

    async fn fetch_relations_of(&self, entity: EntityRef) -> Result<Vec<WireElement>, FetchError> {
        let url = format!("{}/{}/relations.json", self.base_url, entity);
        let response: ElementsResponse = self.get_json(&url).await?;
        Ok(response.elements)
    }

    async fn fetch_changeset(&self, id: i64) -> Result<Changeset, FetchError> {
        let url = format!("{}/changeset/{}.json", self.base_url, id);
        let response: ChangesetResponse = self.get_json(&url).await?;
        response.into_changeset().ok_or(FetchError::NotFound)
    }
}
