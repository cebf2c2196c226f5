use std::sync::Arc;
use tracing::{info, instrument};

use crate::app::ports::HttpClientPort;
use crate::domain::BookRecord;
use crate::error::Result;
use crate::pipeline::ingestion::{fetch_feed, FeedSource};
use crate::pipeline::processing::normalize::{Normalizer, SheetNormalizer};
use crate::pipeline::processing::parser::{CsvParser, Parser};

/// Use case for one load cycle: fetch the feed, parse it, normalize the rows.
///
/// All-or-nothing: a fetch failure yields no books at all.
pub struct LoadBooksUseCase {
    http: Arc<dyn HttpClientPort>,
    parser: Box<dyn Parser + Send + Sync>,
    normalizer: Box<dyn Normalizer + Send + Sync>,
}

impl LoadBooksUseCase {
    pub fn new(
        http: Arc<dyn HttpClientPort>,
        parser: Box<dyn Parser + Send + Sync>,
        normalizer: Box<dyn Normalizer + Send + Sync>,
    ) -> Self {
        Self {
            http,
            parser,
            normalizer,
        }
    }

    /// Create a use case with the CSV parser and the sheet normalizer
    pub fn with_defaults(http: Arc<dyn HttpClientPort>) -> Self {
        Self::new(http, Box::new(CsvParser::new()), Box::new(SheetNormalizer::new()))
    }

    #[instrument(skip_all, fields(source = %source))]
    pub async fn load(&self, source: &FeedSource) -> Result<Vec<BookRecord>> {
        let text = fetch_feed(self.http.as_ref(), source).await?;
        Ok(self.load_text(&text))
    }

    /// Parse and normalize feed text that is already in hand.
    pub fn load_text(&self, text: &str) -> Vec<BookRecord> {
        let rows = self.parser.parse(text);
        let books = self.normalizer.normalize_all(&rows);
        info!("Loaded {} books from {} rows", books.len(), rows.len());
        books
    }
}
