//! Item data model
//!
//! An item is one catalogue entry as extracted from its detail page
//! ([`ItemDetail`]) and, once persisted, as read back from the store
//! ([`ItemRecord`]).

mod origin;
mod slug;

pub use origin::absolutize;
pub use slug::slugify;

use serde::{Deserialize, Serialize};

/// Poster used when a page carries no social-preview image
pub const PLACEHOLDER_POSTER: &str = "https://via.placeholder.com/300x450";

/// Label used for button links without text and for the source-page fallback
pub const DEFAULT_LINK_LABEL: &str = "Download";

/// One labelled download link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadLink {
    pub label: String,
    pub url: String,
}

impl DownloadLink {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

/// Fields extracted from a detail page, not yet persisted
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDetail {
    pub title: String,
    pub slug: String,
    pub poster_url: String,
    pub description: String,
    pub rating: f64,
    pub screenshots: Vec<String>,
    pub download_links: Vec<DownloadLink>,
    pub genres: Vec<String>,
    pub cast: Vec<String>,
    pub languages: Vec<String>,
    pub size: Option<String>,
    pub quality: Option<String>,
    pub resolution: Option<String>,
    pub audio: Option<String>,
    pub release_year: Option<i32>,
}

impl ItemDetail {
    /// The URL the refresh flow re-fetches
    pub fn primary_link(&self) -> Option<&str> {
        self.download_links.first().map(|link| link.url.as_str())
    }
}

/// A persisted item
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRecord {
    pub id: i64,
    pub detail: ItemDetail,
    pub created_at: String,
    pub updated_at: String,
}

impl ItemRecord {
    pub fn slug(&self) -> &str {
        &self.detail.slug
    }

    pub fn primary_link(&self) -> Option<&str> {
        self.detail.primary_link()
    }
}
