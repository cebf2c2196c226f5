use std::fmt;
use std::path::PathBuf;
use tracing::{info, instrument};

use crate::app::ports::HttpClientPort;
use crate::error::{BookwormzError, Result};

/// Where the spreadsheet CSV comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Url(String),
    File(PathBuf),
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedSource::Url(url) => write!(f, "{url}"),
            FeedSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetch the full feed text. Every failure is reported as `FeedFetch`.
#[instrument(skip_all, fields(source = %source))]
pub async fn fetch_feed(http: &dyn HttpClientPort, source: &FeedSource) -> Result<String> {
    let bytes = match source {
        FeedSource::Url(url) => {
            let resp = http
                .get(url)
                .await
                .map_err(|e| BookwormzError::FeedFetch(e.to_string()))?;
            if !resp.is_success() {
                return Err(BookwormzError::FeedFetch(format!(
                    "spreadsheet returned HTTP {}",
                    resp.status
                )));
            }
            resp.bytes
        }
        FeedSource::File(path) => tokio::fs::read(path).await.map_err(|e| {
            BookwormzError::FeedFetch(format!("cannot read {}: {}", path.display(), e))
        })?,
    };

    let text = String::from_utf8(bytes)
        .map_err(|e| BookwormzError::FeedFetch(format!("feed is not valid UTF-8: {e}")))?;
    info!("Fetched feed ({} bytes)", text.len());
    Ok(text)
}
