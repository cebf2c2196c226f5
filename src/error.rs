use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookwormzError {
    #[error("Could not load the book list: {0}")]
    FeedFetch(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog error: {message}")]
    Catalog { message: String },
}

pub type Result<T> = std::result::Result<T, BookwormzError>;
