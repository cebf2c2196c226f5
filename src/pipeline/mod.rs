// Book pipeline: feed ingestion, processing, and the leaderboard view model

pub mod ingestion;
pub mod processing;
pub mod view;

// Re-export key types and functions from each stage
pub use ingestion::{fetch_feed, FeedSource};
pub use processing::parser;
pub use view::{build_view, Filter, LeaderboardView, SortKey};
