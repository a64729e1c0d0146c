//! Reel-Harvest: a paced catalogue harvester
//!
//! This crate walks the listing pages of a single movie catalogue site,
//! extracts one structured record per detail page and stores it keyed by a
//! slug derived from the title. A refresh mode re-visits stored records to
//! replace their download links, or delete them once the source drops them.

pub mod config;
pub mod crawler;
pub mod item;
pub mod output;
pub mod storage;

use thiserror::Error;

/// Main error type for Reel-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Failed to open store at {path}: {source}")]
    StoreConnection {
        path: String,
        source: storage::StorageError,
    },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
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

    #[error("No store configured: set {} or [store] database-path", config::DATABASE_ENV)]
    MissingStore,
}

/// Result type alias for Reel-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use item::{slugify, DownloadLink, ItemDetail, ItemRecord};
