use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use super::candidate::select_best;
use crate::app::ports::CatalogSearchPort;
use crate::config::CatalogConfig;
use crate::constants;
use crate::domain::{BookRecord, CatalogMatch};
use crate::error::Result;

/// A catalog query in the catalog's free-text syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogQuery {
    Isbn(String),
    TitleAuthor { title: String, author: Option<String> },
    Title(String),
}

impl fmt::Display for CatalogQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogQuery::Isbn(isbn) => write!(f, "isbn:{isbn}"),
            CatalogQuery::TitleAuthor { title, author: Some(author) } => {
                write!(f, "intitle:{title} inauthor:{author}")
            }
            CatalogQuery::TitleAuthor { title, author: None } | CatalogQuery::Title(title) => {
                write!(f, "intitle:{title}")
            }
        }
    }
}

/// Resolves a book to at most one catalog rating through an ordered fallback chain:
/// ISBN, then title+author, then title alone.
pub struct CatalogMatcher {
    search: Arc<dyn CatalogSearchPort>,
    isbn_max_results: u32,
    search_max_results: u32,
}

impl CatalogMatcher {
    pub fn new(search: Arc<dyn CatalogSearchPort>) -> Self {
        Self {
            search,
            isbn_max_results: constants::ISBN_MAX_RESULTS,
            search_max_results: constants::SEARCH_MAX_RESULTS,
        }
    }

    pub fn from_config(search: Arc<dyn CatalogSearchPort>, config: &CatalogConfig) -> Self {
        Self {
            search,
            isbn_max_results: config.isbn_max_results,
            search_max_results: config.search_max_results,
        }
    }

    pub async fn match_book(&self, book: &BookRecord) -> Option<CatalogMatch> {
        self.find_match(book.isbn.as_deref(), &book.title, book.author.as_deref())
            .await
    }

    /// Never fails: lookup errors are logged and reported as no match.
    #[instrument(skip(self), level = "debug")]
    pub async fn find_match(
        &self,
        isbn: Option<&str>,
        title: &str,
        author: Option<&str>,
    ) -> Option<CatalogMatch> {
        match self.try_match(isbn, title, author).await {
            Ok(found) => found,
            Err(e) => {
                warn!("Catalog lookup failed for {:?}: {}", title, e);
                None
            }
        }
    }

    async fn try_match(
        &self,
        isbn: Option<&str>,
        title: &str,
        author: Option<&str>,
    ) -> Result<Option<CatalogMatch>> {
        let title_author = CatalogQuery::TitleAuthor {
            title: title.to_string(),
            author: author.map(str::to_string),
        };

        if let Some(isbn) = isbn.map(str::trim).filter(|i| !i.is_empty()) {
            let by_isbn = self
                .search
                .search(&CatalogQuery::Isbn(isbn.to_string()).to_string(), self.isbn_max_results)
                .await?;

            if let Some(best) = select_best(&by_isbn) {
                if best.has_rating() {
                    debug!("Rated ISBN match for {:?}", title);
                    return Ok(Some(best));
                }

                let by_title_author = self
                    .search
                    .search(&title_author.to_string(), self.search_max_results)
                    .await?;
                let merged = match select_best(&by_title_author) {
                    Some(rated) => CatalogMatch {
                        thumbnail_url: rated.thumbnail_url.or(best.thumbnail_url),
                        ..rated
                    },
                    None => best,
                };
                debug!("Merged ISBN cover with title+author rating for {:?}", title);
                return Ok(Some(merged));
            }
        }

        let by_title_author = self
            .search
            .search(&title_author.to_string(), self.search_max_results)
            .await?;
        if let Some(best) = select_best(&by_title_author) {
            return Ok(Some(best));
        }
        // Without an author the previous query was already title-only
        if author.is_none() {
            return Ok(None);
        }

        let by_title = self
            .search
            .search(&CatalogQuery::Title(title.to_string()).to_string(), self.search_max_results)
            .await?;
        Ok(select_best(&by_title))
    }
}
