//! Column headers and defaults shared across the crate.
//! Headers are matched against the spreadsheet by exact string.

// Spreadsheet feed columns
pub const COL_TITLE: &str = "Book Title";
pub const COL_AUTHOR: &str = "Author";
pub const COL_YEAR: &str = "Year Published";
pub const COL_PICKER: &str = "Who Picked";
pub const COL_DATE: &str = "Date Picked";
pub const COL_DON_SCORE: &str = "Don Score";
pub const COL_DAVE_SCORE: &str = "Dave Score";
pub const COL_CHAN_SCORE: &str = "Chan Score";
pub const COL_AVG_SCORE: &str = "Average Score";
pub const COL_ISBN: &str = "ISBN";
pub const COL_GOODREADS: &str = "Goodreads score";

// Catalog lookups
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://www.googleapis.com/books/v1/volumes";
pub const ISBN_MAX_RESULTS: u32 = 5;
pub const SEARCH_MAX_RESULTS: u32 = 10;

// Enrichment queue
pub const DEFAULT_ENRICH_CONCURRENCY: usize = 1;

// Config file and environment overrides
pub const DEFAULT_CONFIG_PATH: &str = "bookwormz.toml";
pub const ENV_FEED_URL: &str = "BOOKWORMZ_FEED_URL";
pub const ENV_CATALOG_API_KEY: &str = "GOOGLE_BOOKS_API_KEY";
pub const ENV_ENRICH_CONCURRENCY: &str = "BOOKWORMZ_ENRICH_CONCURRENCY";

/// Picker filter value that matches every book.
pub const ALL_PICKERS: &str = "All";
