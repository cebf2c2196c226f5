use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::constants;
use crate::error::{BookwormzError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub feed: FeedConfig,
    pub catalog: CatalogConfig,
    pub enrichment: EnrichmentConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub isbn_max_results: u32,
    pub search_max_results: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: constants::DEFAULT_CATALOG_BASE_URL.to_string(),
            api_key: None,
            isbn_max_results: constants::ISBN_MAX_RESULTS,
            search_max_results: constants::SEARCH_MAX_RESULTS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    pub enabled: bool,
    pub concurrency: usize,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            concurrency: constants::DEFAULT_ENRICH_CONCURRENCY,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from `bookwormz.toml` when no path is given.
    ///
    /// A missing default file yields defaults; a missing explicit file is an error.
    /// Environment overrides are applied afterwards.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(constants::DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    debug!("No {} found, using defaults", constants::DEFAULT_CONFIG_PATH);
                    Config::default()
                }
            }
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.enrichment.concurrency = config.enrichment.concurrency.max(1);
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            let path = path.display();
            BookwormzError::Config(format!("Failed to read config file '{path}': {e}"))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup` (injected so tests don't touch process env).
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(constants::ENV_FEED_URL).filter(|v| !v.trim().is_empty()) {
            self.feed.url = Some(url);
        }
        if let Some(key) = lookup(constants::ENV_CATALOG_API_KEY).filter(|v| !v.trim().is_empty()) {
            self.catalog.api_key = Some(key);
        }
        if let Some(raw) = lookup(constants::ENV_ENRICH_CONCURRENCY) {
            match raw.trim().parse::<usize>() {
                Ok(n) => self.enrichment.concurrency = n,
                Err(_) => warn!(
                    "Ignoring {}={:?}: not a positive integer",
                    constants::ENV_ENRICH_CONCURRENCY,
                    raw
                ),
            }
        }
    }

    pub fn feed_url(&self) -> Result<&str> {
        self.feed
            .url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                BookwormzError::Config(format!(
                    "no feed URL configured (set [feed] url, {} or --feed-url)",
                    constants::ENV_FEED_URL
                ))
            })
    }
}
