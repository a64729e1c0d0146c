//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the ItemStore trait.
//! List fields are stored as JSON arrays.

use crate::item::{DownloadLink, ItemDetail, ItemRecord};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{ItemStore, StorageError, StorageResult};
use crate::storage::{RunMode, RunRecord, RunTotals};
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use serde::de::DeserializeOwned;
use std::path::Path;

const ITEM_COLUMNS: &str = "id, title, slug, poster_url, description, rating, screenshots,
     download_links, genres, cast_members, languages, size, quality, resolution, audio,
     release_year, created_at, updated_at";

const RUN_COLUMNS: &str = "id, mode, config_hash, started_at, finished_at,
     processed, saved, updated, deleted, skipped, failed";

/// SQLite item store
///
/// Acquired with [`SqliteStore::open`] and released with
/// [`SqliteStore::close`] (or when dropped).
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens or creates the database at `path`
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Closes the connection, reporting any error from SQLite
    pub fn close(self) -> StorageResult<()> {
        self.conn.close().map_err(|(_, e)| StorageError::Sqlite(e))
    }
}

fn json_column<T: DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn row_to_item(row: &Row<'_>) -> rusqlite::Result<ItemRecord> {
    Ok(ItemRecord {
        id: row.get(0)?,
        detail: ItemDetail {
            title: row.get(1)?,
            slug: row.get(2)?,
            poster_url: row.get(3)?,
            description: row.get(4)?,
            rating: row.get(5)?,
            screenshots: json_column(row, 6)?,
            download_links: json_column(row, 7)?,
            genres: json_column(row, 8)?,
            cast: json_column(row, 9)?,
            languages: json_column(row, 10)?,
            size: row.get(11)?,
            quality: row.get(12)?,
            resolution: row.get(13)?,
            audio: row.get(14)?,
            release_year: row.get(15)?,
        },
        created_at: row.get(16)?,
        updated_at: row.get(17)?,
    })
}

fn row_to_run(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        mode: RunMode::from_db_string(&row.get::<_, String>(1)?).unwrap_or(RunMode::Crawl),
        config_hash: row.get(2)?,
        started_at: row.get(3)?,
        finished_at: row.get(4)?,
        totals: RunTotals {
            processed: row.get::<_, i64>(5)? as u64,
            saved: row.get::<_, i64>(6)? as u64,
            updated: row.get::<_, i64>(7)? as u64,
            deleted: row.get::<_, i64>(8)? as u64,
            skipped: row.get::<_, i64>(9)? as u64,
            failed: row.get::<_, i64>(10)? as u64,
        },
    })
}

fn is_constraint_violation(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

impl ItemStore for SqliteStore {
    // ===== Items =====

    fn find_by_slug(&self, slug: &str) -> StorageResult<Option<ItemRecord>> {
        let sql = format!("SELECT {} FROM items WHERE slug = ?1", ITEM_COLUMNS);
        let item = self
            .conn
            .query_row(&sql, params![slug], row_to_item)
            .optional()?;
        Ok(item)
    }

    fn create(&mut self, item: &ItemDetail) -> StorageResult<i64> {
        let primary_link = item
            .primary_link()
            .ok_or_else(|| StorageError::EmptyDownloadLinks(item.slug.clone()))?;

        let now = Utc::now().to_rfc3339();
        let result = self.conn.execute(
            "INSERT INTO items (title, slug, poster_url, description, rating, screenshots,
             download_links, primary_link, genres, cast_members, languages, size, quality,
             resolution, audio, release_year, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
             ?17, ?17)",
            params![
                item.title,
                item.slug,
                item.poster_url,
                item.description,
                item.rating,
                serde_json::to_string(&item.screenshots)?,
                serde_json::to_string(&item.download_links)?,
                primary_link,
                serde_json::to_string(&item.genres)?,
                serde_json::to_string(&item.cast)?,
                serde_json::to_string(&item.languages)?,
                item.size,
                item.quality,
                item.resolution,
                item.audio,
                item.release_year,
                now,
            ],
        );

        match result {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(e) if is_constraint_violation(&e) => {
                Err(StorageError::DuplicateSlug(item.slug.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn update_download_links(&mut self, id: i64, links: &[DownloadLink]) -> StorageResult<()> {
        let primary_link = links
            .first()
            .map(|link| link.url.as_str())
            .ok_or_else(|| StorageError::EmptyDownloadLinks(format!("id {}", id)))?;

        let now = Utc::now().to_rfc3339();
        let changed = self.conn.execute(
            "UPDATE items SET download_links = ?1, primary_link = ?2, updated_at = ?3
             WHERE id = ?4",
            params![serde_json::to_string(links)?, primary_link, now, id],
        )?;

        if changed == 0 {
            return Err(StorageError::ItemNotFound(id));
        }
        Ok(())
    }

    fn delete(&mut self, id: i64) -> StorageResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM items WHERE id = ?1", params![id])?;

        if changed == 0 {
            return Err(StorageError::ItemNotFound(id));
        }
        Ok(())
    }

    fn find_by_primary_link_prefix(&self, prefix: &str) -> StorageResult<Vec<ItemRecord>> {
        let sql = format!(
            "SELECT {} FROM items WHERE substr(primary_link, 1, length(?1)) = ?1 ORDER BY id",
            ITEM_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let items = stmt
            .query_map(params![prefix], row_to_item)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    fn count_items(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    // ===== Runs =====

    fn create_run(&mut self, mode: RunMode, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (mode, config_hash, started_at) VALUES (?1, ?2, ?3)",
            params![mode.to_db_string(), config_hash, now],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn complete_run(&mut self, run_id: i64, totals: &RunTotals) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let changed = self.conn.execute(
            "UPDATE runs SET finished_at = ?1, processed = ?2, saved = ?3, updated = ?4,
             deleted = ?5, skipped = ?6, failed = ?7 WHERE id = ?8",
            params![
                now,
                totals.processed as i64,
                totals.saved as i64,
                totals.updated as i64,
                totals.deleted as i64,
                totals.skipped as i64,
                totals.failed as i64,
                run_id
            ],
        )?;

        if changed == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn recent_runs(&self, limit: usize) -> StorageResult<Vec<RunRecord>> {
        let sql = format!("SELECT {} FROM runs ORDER BY id DESC LIMIT ?1", RUN_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let runs = stmt
            .query_map(params![limit as i64], row_to_run)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(runs)
    }
}
