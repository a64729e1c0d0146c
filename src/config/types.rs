use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Main configuration structure for Reel-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    pub http: HttpConfig,
    pub pacing: PacingConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Direction in which listing pages are enumerated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlOrder {
    Forward,
    #[default]
    Reverse,
}

impl fmt::Display for CrawlOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => write!(f, "forward"),
            Self::Reverse => write!(f, "reverse"),
        }
    }
}

/// Source site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Origin of the listing and detail pages (e.g. "https://vegavinc.com")
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Number of listing pages the site exposes
    #[serde(rename = "total-pages")]
    pub total_pages: u32,

    #[serde(default)]
    pub order: CrawlOrder,

    /// First page to visit; defaults to the natural start for `order`
    #[serde(rename = "start-page", default)]
    pub start_page: Option<u32>,
}

impl SiteConfig {
    /// The site origin without a trailing slash
    pub fn origin(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// Request header and block-detection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    #[serde(default)]
    pub accept: Option<String>,

    #[serde(default)]
    pub referer: Option<String>,

    /// Bodies shorter than this are treated as a block page
    #[serde(rename = "min-body-length", default = "default_min_body_length")]
    pub min_body_length: usize,

    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_min_body_length() -> usize {
    1000
}

fn default_timeout_secs() -> u64 {
    30
}

/// Fixed delays between network operations
#[derive(Debug, Clone, Deserialize)]
pub struct PacingConfig {
    /// Delay after every detail fetch and every refreshed record (milliseconds)
    #[serde(rename = "item-delay-ms")]
    pub item_delay_ms: u64,

    /// Delay after every listing page (milliseconds)
    #[serde(rename = "page-delay-ms")]
    pub page_delay_ms: u64,
}

impl PacingConfig {
    pub fn item_delay(&self) -> Duration {
        Duration::from_millis(self.item_delay_ms)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}

/// Store location
///
/// After loading, `database_path` always holds the resolved location.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    #[serde(rename = "database-path", default)]
    pub database_path: Option<String>,
}
