//! Refresh flow tests

use crate::common::{create_test_config, html_page, stored_item};
use reel_harvest::config::CrawlOrder;
use reel_harvest::crawler::{harvest, Coordinator, HarvestMode};
use reel_harvest::item::DownloadLink;
use reel_harvest::storage::{ItemStore, RunMode, SqliteStore};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn button_page(buttons: &[(&str, &str)]) -> String {
    let anchors: String = buttons
        .iter()
        .map(|(label, href)| {
            format!(
                r#"<a class="btn" href="{}"><button> {} </button></a>"#,
                href, label
            )
        })
        .collect();
    html_page(&format!(r#"<div class="download-links-div">{}</div>"#, anchors))
}

#[tokio::test]
async fn test_refresh_replaces_links_and_deletes_removed_items() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/jawan/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(button_page(&[("720p", "https://x/y")])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    // The source dropped this one: the page has no button links at all
    Mock::given(method("GET"))
        .and(path("/gone/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page(
            r#"<div class="download-links-div">
                <h3>720p</h3>
                <h3><a href="https://x/old">link</a></h3>
            </div>"#,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut store = SqliteStore::open_in_memory().unwrap();
    let jawan = stored_item(
        "Jawan",
        vec![DownloadLink::new("Download", format!("{}/jawan/", base_url))],
    );
    store.create(&jawan).unwrap();
    store
        .create(&stored_item(
            "Gone Girl",
            vec![DownloadLink::new("Download", format!("{}/gone/", base_url))],
        ))
        .unwrap();
    // Points elsewhere, so it is never re-fetched
    store
        .create(&stored_item(
            "Pathaan",
            vec![DownloadLink::new("720p", "https://links.example/p")],
        ))
        .unwrap();

    let config = create_test_config(&base_url, 1, CrawlOrder::Reverse);
    let totals = {
        let mut coordinator = Coordinator::new(&config, &mut store).unwrap();
        coordinator.run_refresh().await.unwrap()
    };

    assert_eq!(totals.processed, 2);
    assert_eq!(totals.updated, 1);
    assert_eq!(totals.deleted, 1);
    assert_eq!(totals.failed, 0);

    let refreshed = store.find_by_slug("jawan").unwrap().unwrap();
    assert_eq!(
        refreshed.detail.download_links,
        vec![DownloadLink::new("720p", "https://x/y")]
    );
    let mut unchanged = refreshed.detail.clone();
    unchanged.download_links = jawan.download_links.clone();
    assert_eq!(unchanged, jawan);

    assert!(store.find_by_slug("gone-girl").unwrap().is_none());
    assert!(store.find_by_slug("pathaan").unwrap().is_some());
    assert_eq!(store.count_items().unwrap(), 2);
}

#[tokio::test]
async fn test_refresh_failures_keep_the_record() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/broken/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/blocked/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&mock_server)
        .await;

    let mut store = SqliteStore::open_in_memory().unwrap();
    for slug in ["broken", "blocked"] {
        store
            .create(&stored_item(
                slug,
                vec![DownloadLink::new("Download", format!("{}/{}/", base_url, slug))],
            ))
            .unwrap();
    }

    let config = create_test_config(&base_url, 1, CrawlOrder::Reverse);
    let totals = {
        let mut coordinator = Coordinator::new(&config, &mut store).unwrap();
        coordinator.run_refresh().await.unwrap()
    };

    assert_eq!(totals.processed, 2);
    assert_eq!(totals.failed, 2);
    assert_eq!(totals.deleted, 0);
    assert_eq!(store.count_items().unwrap(), 2);
}

#[tokio::test]
async fn test_refresh_run_is_recorded() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/jawan/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(button_page(&[
            ("G-Drive 720p", "https://x/720"),
            ("", "https://x/1080"),
        ])))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("items.db");
    {
        let mut store = SqliteStore::open(&db_path).unwrap();
        store
            .create(&stored_item(
                "Jawan",
                vec![DownloadLink::new("Download", format!("{}/jawan/", base_url))],
            ))
            .unwrap();
        store.close().unwrap();
    }

    let mut config = create_test_config(&base_url, 1, CrawlOrder::Reverse);
    config.store.database_path = Some(db_path.display().to_string());

    let totals = harvest(&config, HarvestMode::Refresh, "hash").await.unwrap();
    assert_eq!(totals.updated, 1);

    let store = SqliteStore::open(&db_path).unwrap();
    let item = store.find_by_slug("jawan").unwrap().unwrap();
    assert_eq!(
        item.detail.download_links,
        vec![
            DownloadLink::new("G-Drive 720p", "https://x/720"),
            DownloadLink::new("Download", "https://x/1080"),
        ]
    );

    let runs = store.recent_runs(1).unwrap();
    assert_eq!(runs[0].mode, RunMode::Refresh);
    assert_eq!(runs[0].totals, totals);
}
