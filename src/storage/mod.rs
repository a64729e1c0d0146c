//! Storage module for persisting harvested items
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Item creation keyed by slug, link refresh and deletion
//! - Run tracking with final counts

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{ItemStore, StorageError, StorageResult};

use crate::HarvestError;
use std::path::Path;

/// Opens the store, mapping failures to a fatal connection error
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStore)` - Successfully opened store
/// * `Err(HarvestError::StoreConnection)` - The database could not be opened
pub fn open_store(path: &Path) -> Result<SqliteStore, HarvestError> {
    SqliteStore::open(path).map_err(|source| HarvestError::StoreConnection {
        path: path.display().to_string(),
        source,
    })
}

/// Which driver mode a run used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Crawl,
    Refresh,
}

impl RunMode {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Crawl => "crawl",
            Self::Refresh => "refresh",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "crawl" => Some(Self::Crawl),
            "refresh" => Some(Self::Refresh),
            _ => None,
        }
    }
}

/// Outcome counts of one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTotals {
    /// Detail pages or refreshed records visited
    pub processed: u64,
    /// New items created
    pub saved: u64,
    /// Items whose download links were replaced
    pub updated: u64,
    /// Items removed because the source dropped them
    pub deleted: u64,
    /// Items already stored or without a usable slug
    pub skipped: u64,
    /// Items or pages that failed to fetch or store
    pub failed: u64,
}

/// Represents a run in the database
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub mode: RunMode,
    pub config_hash: String,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub totals: RunTotals,
}
