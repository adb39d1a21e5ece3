//! Kniss-Harvest: a paced listing harvester
//!
//! This crate pages through a classifieds marketplace's GraphQL search API,
//! flattens each vehicle listing into a record, and hands the records to one
//! or more sinks. Pagination is strictly sequential and stops at the first
//! page that cannot be processed.

pub mod config;
pub mod crawler;
pub mod listing;
pub mod output;
pub mod query;
pub mod storage;

use thiserror::Error;

/// Main error type for Kniss-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Sink error: {0}")]
    Sink(#[from] output::SinkError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Failure to turn one search response into records
///
/// Raised at the page boundary only. The crawl loop logs it together with the
/// raw body and stops; it never reaches the caller of [`crawler::crawl`].
#[derive(Debug, Error)]
pub enum PageProcessingError {
    #[error("Response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unexpected shape at `{path}`: expected {expected}")]
    UnexpectedShape { path: String, expected: &'static str },
}

/// Result type alias for Kniss-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, CrawlReport, StopReason};
pub use listing::{handle_response, ListingRecord, PageOutcome};
pub use query::QueryRequest;
