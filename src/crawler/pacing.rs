//! Page enumeration and fixed-delay pacing
//!
//! The crawl is strictly sequential. Pacing only ever suspends the current
//! task between network operations; it never limits concurrency because
//! there is none.

use crate::config::{CrawlOrder, PacingConfig};
use std::time::Duration;

/// The listing pages a bulk crawl visits, in visiting order
///
/// `start_page` always lies within `1..=total_pages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlPlan {
    order: CrawlOrder,
    total_pages: u32,
    start_page: u32,
}

impl CrawlPlan {
    /// Builds a plan; `start_page` defaults to the natural start for `order`
    ///
    /// An out-of-range start page is clamped into `1..=total_pages`.
    pub fn new(order: CrawlOrder, total_pages: u32, start_page: Option<u32>) -> Self {
        let total_pages = total_pages.max(1);
        let natural = match order {
            CrawlOrder::Forward => 1,
            CrawlOrder::Reverse => total_pages,
        };
        let start_page = start_page.unwrap_or(natural).clamp(1, total_pages);

        Self {
            order,
            total_pages,
            start_page,
        }
    }

    pub fn order(&self) -> CrawlOrder {
        self.order
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn start_page(&self) -> u32 {
        self.start_page
    }

    /// Page numbers in visiting order
    ///
    /// ```
    /// use reel_harvest::config::CrawlOrder;
    /// use reel_harvest::crawler::CrawlPlan;
    ///
    /// let plan = CrawlPlan::new(CrawlOrder::Reverse, 3, None);
    /// assert_eq!(plan.pages().collect::<Vec<_>>(), vec![3, 2, 1]);
    /// ```
    pub fn pages(&self) -> Box<dyn Iterator<Item = u32>> {
        match self.order {
            CrawlOrder::Forward => Box::new(self.start_page..=self.total_pages),
            CrawlOrder::Reverse => Box::new((1..=self.start_page).rev()),
        }
    }

    /// Number of pages the plan visits
    pub fn page_count(&self) -> u32 {
        match self.order {
            CrawlOrder::Forward => self.total_pages.saturating_sub(self.start_page) + 1,
            CrawlOrder::Reverse => self.start_page,
        }
    }
}

/// Fixed delays between items and between pages
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    item_delay: Duration,
    page_delay: Duration,
}

impl Pacer {
    pub fn new(item_delay: Duration, page_delay: Duration) -> Self {
        Self {
            item_delay,
            page_delay,
        }
    }

    pub fn from_config(config: &PacingConfig) -> Self {
        Self::new(config.item_delay(), config.page_delay())
    }

    /// Waits after a detail fetch or a refreshed record
    pub async fn after_item(&self) {
        pause(self.item_delay).await;
    }

    /// Waits after a listing page
    pub async fn after_page(&self) {
        pause(self.page_delay).await;
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
