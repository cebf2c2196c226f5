use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

use crate::app::ports::{CatalogSearchPort, HttpClientPort};
use crate::config::CatalogConfig;
use crate::error::{BookwormzError, Result};
use crate::pipeline::processing::catalog::candidate::CatalogCandidate;

/// Volumes search response; only the fields used for matching are modelled.
#[derive(Debug, Default, Deserialize)]
pub struct VolumesResponse {
    #[serde(default)]
    pub items: Vec<Volume>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    #[serde(default)]
    pub volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    pub average_rating: Option<f64>,
    pub ratings_count: Option<u64>,
    pub image_links: Option<ImageLinks>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    pub thumbnail: Option<String>,
    pub small_thumbnail: Option<String>,
}

impl From<Volume> for CatalogCandidate {
    fn from(volume: Volume) -> Self {
        let info = volume.volume_info;
        let thumbnail_url = info
            .image_links
            .and_then(|links| links.thumbnail.or(links.small_thumbnail));
        CatalogCandidate {
            average_rating: info.average_rating,
            ratings_count: info.ratings_count,
            thumbnail_url,
        }
    }
}

/// `CatalogSearchPort` backed by the Google Books volumes endpoint.
pub struct GoogleBooksCatalog {
    http: Arc<dyn HttpClientPort>,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleBooksCatalog {
    pub fn new(http: Arc<dyn HttpClientPort>, config: &CatalogConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
        }
    }

    pub fn search_url(&self, query: &str, max_results: u32) -> Result<Url> {
        let max_results = max_results.to_string();
        let mut params = vec![("q", query), ("maxResults", max_results.as_str())];
        if let Some(key) = &self.api_key {
            params.push(("key", key.as_str()));
        }
        Url::parse_with_params(&self.base_url, &params).map_err(|e| BookwormzError::Catalog {
            message: format!("invalid catalog URL '{}': {}", self.base_url, e),
        })
    }
}

#[async_trait]
impl CatalogSearchPort for GoogleBooksCatalog {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<CatalogCandidate>> {
        let url = self.search_url(query, max_results)?;
        let resp = self.http.get(url.as_str()).await?;
        if !resp.is_success() {
            return Err(BookwormzError::Catalog {
                message: format!("catalog returned HTTP {} for {:?}", resp.status, query),
            });
        }

        let body: VolumesResponse = serde_json::from_slice(&resp.bytes)?;
        debug!("catalog query {:?} returned {} items", query, body.items.len());
        Ok(body.items.into_iter().map(CatalogCandidate::from).collect())
    }
}
