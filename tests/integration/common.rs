//! Shared fixtures for the integration tests

use reel_harvest::config::{
    Config, CrawlOrder, HttpConfig, PacingConfig, SiteConfig, StoreConfig,
};
use reel_harvest::item::{DownloadLink, ItemDetail, ItemRecord};
use reel_harvest::storage::{
    ItemStore, RunMode, RunRecord, RunTotals, SqliteStore, StorageResult,
};

/// Bodies shorter than this are treated as blocked in tests
pub const MIN_BODY: usize = 200;

/// Creates a test configuration pointed at a mock server
pub fn create_test_config(base_url: &str, total_pages: u32, order: CrawlOrder) -> Config {
    Config {
        site: SiteConfig {
            base_url: base_url.to_string(),
            total_pages,
            order,
            start_page: None,
        },
        http: HttpConfig {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string(),
            accept: Some("text/html,application/xhtml+xml".to_string()),
            referer: Some("https://google.com/".to_string()),
            min_body_length: MIN_BODY,
            timeout_secs: 5,
        },
        pacing: PacingConfig {
            // Very short for testing
            item_delay_ms: 0,
            page_delay_ms: 0,
        },
        store: StoreConfig {
            database_path: None,
        },
    }
}

/// Wraps markup in a full document long enough to pass block detection
pub fn html_page(body: &str) -> String {
    format!(
        "<html><head><title>Vega</title></head><body>{}<!-- {} --></body></html>",
        body,
        "padding ".repeat(MIN_BODY / 4)
    )
}

/// A listing page linking to the given detail URLs
pub fn listing_page(links: &[String]) -> String {
    let entries: String = links
        .iter()
        .map(|href| {
            format!(
                r#"<article><h3 class="entry-title"><a href="{}">entry</a></h3></article>"#,
                href
            )
        })
        .collect();
    html_page(&format!(r#"<div class="movie-grid">{}</div>"#, entries))
}

/// A detail page with a title, one info paragraph and one heading link pair
pub fn detail_page(title: &str, link: &str) -> String {
    html_page(&format!(
        r#"<h1 class="entry-title">{}</h1>
        <p><strong>IMDb Rating:</strong> 6.8/10
        <br><strong>Genres:</strong> Action, Drama</p>
        <div class="download-links-div">
            <h3>{} 720p [1GB]</h3>
            <h3><a href="{}"><button>Download</button></a></h3>
        </div>"#,
        title, title, link
    ))
}

/// A minimal stored item
pub fn stored_item(title: &str, links: Vec<DownloadLink>) -> ItemDetail {
    ItemDetail {
        title: title.to_string(),
        slug: reel_harvest::slugify(title),
        poster_url: "https://via.placeholder.com/300x450".to_string(),
        description: title.to_string(),
        rating: 7.1,
        screenshots: vec![],
        download_links: links,
        genres: vec!["Drama".to_string()],
        cast: vec![],
        languages: vec!["Hindi".to_string()],
        size: None,
        quality: Some("720p".to_string()),
        resolution: Some("720p".to_string()),
        audio: None,
        release_year: None,
    }
}

/// Store that records every item handed to `create`
pub struct RecordingStore {
    pub inner: SqliteStore,
    pub created: Vec<String>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self {
            inner: SqliteStore::open_in_memory().expect("in-memory store"),
            created: Vec::new(),
        }
    }
}

impl ItemStore for RecordingStore {
    fn find_by_slug(&self, slug: &str) -> StorageResult<Option<ItemRecord>> {
        self.inner.find_by_slug(slug)
    }

    fn create(&mut self, item: &ItemDetail) -> StorageResult<i64> {
        self.created.push(item.slug.clone());
        self.inner.create(item)
    }

    fn update_download_links(&mut self, id: i64, links: &[DownloadLink]) -> StorageResult<()> {
        self.inner.update_download_links(id, links)
    }

    fn delete(&mut self, id: i64) -> StorageResult<()> {
        self.inner.delete(id)
    }

    fn find_by_primary_link_prefix(&self, prefix: &str) -> StorageResult<Vec<ItemRecord>> {
        self.inner.find_by_primary_link_prefix(prefix)
    }

    fn count_items(&self) -> StorageResult<u64> {
        self.inner.count_items()
    }

    fn create_run(&mut self, mode: RunMode, config_hash: &str) -> StorageResult<i64> {
        self.inner.create_run(mode, config_hash)
    }

    fn complete_run(&mut self, run_id: i64, totals: &RunTotals) -> StorageResult<()> {
        self.inner.complete_run(run_id, totals)
    }

    fn recent_runs(&self, limit: usize) -> StorageResult<Vec<RunRecord>> {
        self.inner.recent_runs(limit)
    }
}
