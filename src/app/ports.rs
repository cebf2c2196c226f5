use async_trait::async_trait;

use crate::error::Result;
use crate::pipeline::processing::catalog::candidate::CatalogCandidate;

#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpGetResult>;
}

#[derive(Clone, Debug)]
pub struct HttpGetResult {
    pub status: u16,
    pub bytes: Vec<u8>,
}

impl HttpGetResult {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// Free-text search against a book catalog.
#[async_trait]
pub trait CatalogSearchPort: Send + Sync {
    /// Candidates in the catalog's relevance order; empty when nothing matched.
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<CatalogCandidate>>;
}
