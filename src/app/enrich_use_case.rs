use std::sync::Arc;

use crate::app::ports::{CatalogSearchPort, HttpClientPort};
use crate::config::{CatalogConfig, EnrichmentConfig};
use crate::domain::{BookRecord, CatalogMatch};
use crate::infra::google_books::GoogleBooksCatalog;
use crate::pipeline::processing::catalog::CatalogMatcher;
use crate::pipeline::processing::enrich::{EnrichmentHandle, EnrichmentQueue, EnrichmentStore};

/// Use case for attaching catalog ratings to loaded books
pub struct EnrichUseCase {
    matcher: Arc<CatalogMatcher>,
    queue: EnrichmentQueue,
}

impl EnrichUseCase {
    pub fn new(
        search: Arc<dyn CatalogSearchPort>,
        catalog: &CatalogConfig,
        enrichment: &EnrichmentConfig,
    ) -> Self {
        let matcher = Arc::new(CatalogMatcher::from_config(search, catalog));
        let store = EnrichmentStore::new();
        let queue = EnrichmentQueue::new(Arc::clone(&matcher), store, enrichment.concurrency);
        Self { matcher, queue }
    }

    /// Create a use case backed by the Google Books catalog
    pub fn with_google_books(
        http: Arc<dyn HttpClientPort>,
        catalog: &CatalogConfig,
        enrichment: &EnrichmentConfig,
    ) -> Self {
        let search = Arc::new(GoogleBooksCatalog::new(http, catalog));
        Self::new(search, catalog, enrichment)
    }

    /// Shared store the display layer reads snapshots from.
    pub fn store(&self) -> &EnrichmentStore {
        self.queue.store()
    }

    pub fn start(&self, books: &[BookRecord]) -> EnrichmentHandle {
        self.queue.start(books)
    }

    /// One-off lookup outside the queue; does not touch the store.
    pub async fn lookup(
        &self,
        isbn: Option<&str>,
        title: &str,
        author: Option<&str>,
    ) -> Option<CatalogMatch> {
        self.matcher.find_match(isbn, title, author).await
    }
}
