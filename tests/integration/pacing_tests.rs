//! Pauses taken by the crawl and refresh loops
//!
//! Delays are small but real; a sleep never ends early, so elapsed time is
//! a lower bound on the pauses the driver took.

use crate::common::{create_test_config, detail_page, listing_page, stored_item};
use reel_harvest::config::CrawlOrder;
use reel_harvest::crawler::{Coordinator, CrawlPlan};
use reel_harvest::item::DownloadLink;
use reel_harvest::storage::{ItemStore, SqliteStore};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ITEM_DELAY_MS: u64 = 60;
const PAGE_DELAY_MS: u64 = 150;

async fn mount(server: &MockServer, route: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_crawl_pauses_after_every_item_and_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Page 1: one good item. Page 2: one missing item. Page 3: listing fails.
    let page_one = listing_page(&[format!("{}/pathaan/", base_url)]);
    let page_two = listing_page(&[format!("{}/missing/", base_url)]);
    mount(&mock_server, "/", ResponseTemplate::new(200).set_body_string(page_one)).await;
    mount(&mock_server, "/page/2/", ResponseTemplate::new(200).set_body_string(page_two)).await;
    mount(&mock_server, "/page/3/", ResponseTemplate::new(503)).await;
    mount(
        &mock_server,
        "/pathaan/",
        ResponseTemplate::new(200).set_body_string(detail_page("Pathaan", "https://x/p")),
    )
    .await;
    mount(&mock_server, "/missing/", ResponseTemplate::new(404)).await;

    let mut config = create_test_config(&base_url, 3, CrawlOrder::Forward);
    config.pacing.item_delay_ms = ITEM_DELAY_MS;
    config.pacing.page_delay_ms = PAGE_DELAY_MS;

    let mut store = SqliteStore::open_in_memory().unwrap();
    let mut coordinator = Coordinator::new(&config, &mut store).unwrap();

    let start = Instant::now();
    let totals = coordinator
        .run_crawl(CrawlPlan::new(CrawlOrder::Forward, 3, None))
        .await;
    let elapsed = start.elapsed();

    assert_eq!(totals.processed, 2);
    assert_eq!(totals.saved, 1);
    assert_eq!(totals.failed, 2);
    // Two items and three pages, failures included
    let minimum = Duration::from_millis(2 * ITEM_DELAY_MS + 3 * PAGE_DELAY_MS);
    assert!(
        elapsed >= minimum,
        "crawl took {:?}, expected at least {:?}",
        elapsed,
        minimum
    );
}

#[tokio::test]
async fn test_refresh_pauses_after_every_record() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount(&mock_server, "/gone/", ResponseTemplate::new(500)).await;

    let mut store = SqliteStore::open_in_memory().unwrap();
    for title in ["Jawan", "Dunki", "Pathaan"] {
        store
            .create(&stored_item(
                title,
                vec![DownloadLink::new("Download", format!("{}/gone/", base_url))],
            ))
            .unwrap();
    }

    let mut config = create_test_config(&base_url, 1, CrawlOrder::Reverse);
    // Refresh only pauses between records
    config.pacing.item_delay_ms = ITEM_DELAY_MS;
    config.pacing.page_delay_ms = 0;

    let mut coordinator = Coordinator::new(&config, &mut store).unwrap();

    let start = Instant::now();
    let totals = coordinator.run_refresh().await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(totals.processed, 3);
    assert_eq!(totals.failed, 3);
    let minimum = Duration::from_millis(3 * ITEM_DELAY_MS);
    assert!(
        elapsed >= minimum,
        "refresh took {:?}, expected at least {:?}",
        elapsed,
        minimum
    );
}
