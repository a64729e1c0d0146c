//! Crawler module for fetching and extracting catalogue pages
//!
//! This module contains the harvesting pipeline:
//! - HTTP fetching with block-page detection
//! - Listing and detail page extraction
//! - Page enumeration and fixed-delay pacing
//! - Crawl and refresh coordination

mod coordinator;
mod detail;
mod fetcher;
mod listing;
mod pacing;

pub use coordinator::{harvest, Coordinator, HarvestMode};
pub use detail::{extract_detail, extract_refresh_links, label_value, QUALITY_TOKENS};
pub use fetcher::{build_http_client, FetchError, Fetcher};
pub use listing::{extract_listing_links, listing_url};
pub use pacing::{CrawlPlan, Pacer};
