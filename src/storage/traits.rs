//! Storage traits and error types
//!
//! This module defines the trait interface for item stores and associated
//! error types.

use crate::item::{DownloadLink, ItemDetail, ItemRecord};
use crate::storage::{RunMode, RunRecord, RunTotals};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("An item with slug '{0}' already exists")]
    DuplicateSlug(String),

    #[error("Item '{0}' has no download links")]
    EmptyDownloadLinks(String),

    #[error("Item not found: {0}")]
    ItemNotFound(i64),

    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for item store implementations
///
/// The store is owned by a single caller and never shared across tasks.
pub trait ItemStore {
    // ===== Items =====

    /// Looks up an item by slug
    fn find_by_slug(&self, slug: &str) -> StorageResult<Option<ItemRecord>>;

    /// Persists a new item and returns its ID
    ///
    /// Fails with `DuplicateSlug` when the slug is taken and with
    /// `EmptyDownloadLinks` when the item carries no links.
    fn create(&mut self, item: &ItemDetail) -> StorageResult<i64>;

    /// Replaces the download links of an item; nothing else changes
    fn update_download_links(&mut self, id: i64, links: &[DownloadLink]) -> StorageResult<()>;

    /// Deletes an item
    fn delete(&mut self, id: i64) -> StorageResult<()>;

    /// Items whose primary download link starts with `prefix`
    fn find_by_primary_link_prefix(&self, prefix: &str) -> StorageResult<Vec<ItemRecord>>;

    /// Total number of stored items
    fn count_items(&self) -> StorageResult<u64>;

    // ===== Runs =====

    /// Records the start of a run and returns its ID
    fn create_run(&mut self, mode: RunMode, config_hash: &str) -> StorageResult<i64>;

    /// Marks a run finished with its final counts
    fn complete_run(&mut self, run_id: i64, totals: &RunTotals) -> StorageResult<()>;

    /// Most recent runs, newest first
    fn recent_runs(&self, limit: usize) -> StorageResult<Vec<RunRecord>>;
}
