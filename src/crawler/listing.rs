//! Listing page extraction
//!
//! A listing page is one page of the site's grid of titles. Each grid entry
//! links to a detail page.

use scraper::{Html, Selector};
use std::collections::HashSet;

/// Anchors of the title grid, in document order
const LISTING_LINK_SELECTOR: &str = ".movie-grid h3.entry-title a";

/// Extracts detail page URLs from listing markup
///
/// Hrefs are returned in document order with duplicates preserved;
/// de-duplication across pages is the job of [`LinkSet`].
///
/// ```
/// use reel_harvest::crawler::extract_listing_links;
///
/// let html = r#"<div class="movie-grid">
///     <h3 class="entry-title"><a href="https://vegavinc.com/a/">A</a></h3>
///     <h3 class="entry-title"><a href="https://vegavinc.com/b/">B</a></h3>
/// </div>"#;
/// assert_eq!(
///     extract_listing_links(html),
///     vec!["https://vegavinc.com/a/", "https://vegavinc.com/b/"]
/// );
/// ```
pub fn extract_listing_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse(LISTING_LINK_SELECTOR) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
        .collect()
}

/// Builds the URL of listing page `page`
///
/// Page 1 is the site root; later pages live under `/page/N/`.
pub fn listing_url(origin: &str, page: u32) -> String {
    let origin = origin.trim_end_matches('/');
    if page <= 1 {
        origin.to_string()
    } else {
        format!("{}/page/{}/", origin, page)
    }
}

/// Insertion-ordered set of detail URLs seen during a run
#[derive(Debug, Default)]
pub struct LinkSet {
    seen: HashSet<String>,
    ordered: Vec<String>,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every link not already present and returns the new ones in order
    pub fn extend_new<I>(&mut self, links: I) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut fresh = Vec::new();
        for link in links {
            if self.seen.insert(link.clone()) {
                self.ordered.push(link.clone());
                fresh.push(link);
            }
        }
        fresh
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }
}
