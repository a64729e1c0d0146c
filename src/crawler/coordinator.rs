//! Crawl driver - sequential harvest and refresh orchestration
//!
//! Two modes share one coordinator:
//! - **Crawl**: listing pages in plan order → detail pages → create the item
//!   unless its slug is already stored.
//! - **Refresh**: stored items whose primary link points at the source site
//!   → re-fetch that link → replace the download links, or delete the item
//!   when none are left.
//!
//! Items are handled one at a time with a fixed pause after each. A failing
//! item is logged and counted; it never stops the run.

use crate::config::Config;
use crate::crawler::detail::{extract_detail, extract_refresh_links};
use crate::crawler::listing::{extract_listing_links, listing_url, LinkSet};
use crate::crawler::pacing::{CrawlPlan, Pacer};
use crate::crawler::Fetcher;
use crate::item::ItemRecord;
use crate::storage::{open_store, ItemStore, RunMode, RunTotals};
use crate::HarvestError;
use std::path::Path;
use url::Url;

/// What a harvest run does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarvestMode {
    Crawl(CrawlPlan),
    Refresh,
}

impl HarvestMode {
    pub fn run_mode(&self) -> RunMode {
        match self {
            Self::Crawl(_) => RunMode::Crawl,
            Self::Refresh => RunMode::Refresh,
        }
    }
}

/// Result of handling one detail URL during a crawl
#[derive(Debug, Clone, PartialEq, Eq)]
enum CrawlOutcome {
    Saved(String),
    AlreadyStored(String),
    MissingSlug,
}

/// Result of refreshing one stored item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefreshOutcome {
    Updated,
    Deleted,
}

/// Sequential crawl driver
///
/// The coordinator borrows the store for its whole lifetime; opening and
/// closing it is the caller's job.
pub struct Coordinator<'a, S: ItemStore> {
    fetcher: Fetcher,
    store: &'a mut S,
    pacer: Pacer,
    base: Url,
    origin: String,
}

impl<'a, S: ItemStore> Coordinator<'a, S> {
    /// Creates a coordinator for the configured site
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(HarvestError)` - Bad base URL or HTTP client setup failure
    pub fn new(config: &Config, store: &'a mut S) -> Result<Self, HarvestError> {
        let origin = config.site.origin().to_string();
        let base = Url::parse(&origin)?;
        let fetcher = Fetcher::new(&config.http)?;

        Ok(Self {
            fetcher,
            store,
            pacer: Pacer::from_config(&config.pacing),
            base,
            origin,
        })
    }

    /// Runs the given mode to completion
    pub async fn run(&mut self, mode: HarvestMode) -> Result<RunTotals, HarvestError> {
        match mode {
            HarvestMode::Crawl(plan) => Ok(self.run_crawl(plan).await),
            HarvestMode::Refresh => self.run_refresh().await,
        }
    }

    /// Walks the listing pages of `plan` and stores every new item
    pub async fn run_crawl(&mut self, plan: CrawlPlan) -> RunTotals {
        let mut totals = RunTotals::default();
        let mut seen = LinkSet::new();
        let start_time = std::time::Instant::now();

        tracing::info!(
            "Starting {} crawl: {} pages from page {}",
            plan.order(),
            plan.page_count(),
            plan.start_page()
        );

        for page in plan.pages() {
            tracing::info!("Page {}/{}", page, plan.total_pages());

            let url = listing_url(&self.origin, page);
            let markup = match self.fetcher.fetch(&url).await {
                Ok(markup) => markup,
                Err(e) => {
                    tracing::warn!("Listing page {} failed: {}", page, e);
                    totals.failed += 1;
                    self.pacer.after_page().await;
                    continue;
                }
            };

            let links: Vec<String> = extract_listing_links(&markup)
                .into_iter()
                .map(|href| self.resolve(&href))
                .collect();
            let found = links.len();
            let fresh = seen.extend_new(links);
            tracing::info!("Items found: {} ({} not seen earlier this run)", found, fresh.len());

            for (index, detail_url) in fresh.iter().enumerate() {
                tracing::info!("Page {} → {}/{}", page, index + 1, fresh.len());
                totals.processed += 1;

                match self.harvest_item(detail_url).await {
                    Ok(CrawlOutcome::Saved(title)) => {
                        totals.saved += 1;
                        tracing::info!("Saved: {}", title);
                    }
                    Ok(CrawlOutcome::AlreadyStored(slug)) => {
                        totals.skipped += 1;
                        tracing::debug!("Already stored: {}", slug);
                    }
                    Ok(CrawlOutcome::MissingSlug) => {
                        totals.skipped += 1;
                        tracing::warn!("No usable title at {}", detail_url);
                    }
                    Err(e) => {
                        totals.failed += 1;
                        tracing::warn!("Failed {}: {}", detail_url, e);
                    }
                }

                self.pacer.after_item().await;
            }

            tracing::info!("Page {} completed", page);
            self.pacer.after_page().await;
        }

        tracing::info!(
            "Crawl finished in {:?}: {} saved, {} skipped, {} failed ({} unique links)",
            start_time.elapsed(),
            totals.saved,
            totals.skipped,
            totals.failed,
            seen.len()
        );

        totals
    }

    /// Re-fetches every stored item that links back to the source site
    ///
    /// Only the initial store query is fatal; per-item errors are counted.
    pub async fn run_refresh(&mut self) -> Result<RunTotals, HarvestError> {
        let mut totals = RunTotals::default();
        let prefix = format!("{}/", self.origin);
        let records = self.store.find_by_primary_link_prefix(&prefix)?;

        tracing::info!("Found {} items to refresh", records.len());

        for record in &records {
            totals.processed += 1;

            match self.refresh_item(record).await {
                Ok(RefreshOutcome::Updated) => {
                    totals.updated += 1;
                    tracing::info!("Updated: {}", record.slug());
                }
                Ok(RefreshOutcome::Deleted) => {
                    totals.deleted += 1;
                    tracing::info!("Deleted (no download links left): {}", record.slug());
                }
                Err(e) => {
                    totals.failed += 1;
                    tracing::warn!(
                        "Failed {} ({}): {}",
                        record.slug(),
                        record.primary_link().unwrap_or("-"),
                        e
                    );
                }
            }

            self.pacer.after_item().await;
        }

        tracing::info!(
            "Refresh finished: {} updated, {} deleted, {} failed",
            totals.updated,
            totals.deleted,
            totals.failed
        );

        Ok(totals)
    }

    async fn harvest_item(&mut self, detail_url: &str) -> Result<CrawlOutcome, HarvestError> {
        let markup = self.fetcher.fetch(detail_url).await?;
        let item = extract_detail(&markup, detail_url, &self.base);

        if item.slug.is_empty() {
            return Ok(CrawlOutcome::MissingSlug);
        }

        if self.store.find_by_slug(&item.slug)?.is_some() {
            return Ok(CrawlOutcome::AlreadyStored(item.slug));
        }

        self.store.create(&item)?;
        Ok(CrawlOutcome::Saved(item.title))
    }

    async fn refresh_item(&mut self, record: &ItemRecord) -> Result<RefreshOutcome, HarvestError> {
        let Some(link) = record.primary_link() else {
            self.store.delete(record.id)?;
            return Ok(RefreshOutcome::Deleted);
        };

        let markup = self.fetcher.fetch(link).await?;
        let links = extract_refresh_links(&markup);

        if links.is_empty() {
            self.store.delete(record.id)?;
            Ok(RefreshOutcome::Deleted)
        } else {
            self.store.update_download_links(record.id, &links)?;
            Ok(RefreshOutcome::Updated)
        }
    }

    fn resolve(&self, href: &str) -> String {
        self.base
            .join(href)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| href.to_string())
    }
}

/// Opens the configured store, runs `mode` and records the run
///
/// A store that cannot be opened is fatal and nothing else happens. Once the
/// run is recorded it is always finished, with empty totals when the run
/// itself fails. The store is closed before returning.
///
/// # Example
///
/// ```no_run
/// use reel_harvest::config::load_config_with_hash;
/// use reel_harvest::crawler::{harvest, HarvestMode};
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (config, hash) = load_config_with_hash(Path::new("harvest.toml"))?;
/// let totals = harvest(&config, HarvestMode::Refresh, &hash).await?;
/// println!("{} updated", totals.updated);
/// # Ok(())
/// # }
/// ```
pub async fn harvest(
    config: &Config,
    mode: HarvestMode,
    config_hash: &str,
) -> Result<RunTotals, HarvestError> {
    let path = config
        .store
        .database_path
        .as_deref()
        .ok_or(crate::ConfigError::MissingStore)?;
    let mut store = open_store(Path::new(path))?;
    tracing::info!("Store opened at {}", path);

    let run_id = store.create_run(mode.run_mode(), config_hash)?;
    let outcome = match Coordinator::new(config, &mut store) {
        Ok(mut coordinator) => coordinator.run(mode).await,
        Err(e) => Err(e),
    };

    let recorded = match &outcome {
        Ok(totals) => *totals,
        Err(e) => {
            tracing::error!("Run {} aborted: {}", run_id, e);
            RunTotals::default()
        }
    };
    let finished = store.complete_run(run_id, &recorded);
    let closed = store.close();

    let totals = outcome?;
    finished?;
    closed?;
    Ok(totals)
}
