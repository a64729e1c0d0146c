//! Fetcher tests against a mock server

use crate::common::{create_test_config, html_page, MIN_BODY};
use reel_harvest::config::CrawlOrder;
use reel_harvest::crawler::{FetchError, Fetcher};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_fetch_sends_fixed_headers() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri(), 1, CrawlOrder::Forward);

    Mock::given(method("GET"))
        .and(path("/detail/"))
        .and(header("user-agent", "Mozilla/5.0 (Windows NT 10.0; Win64; x64)"))
        .and(header("referer", "https://google.com/"))
        .and(header("accept", "text/html,application/xhtml+xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page("<p>ok</p>")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::new(&config.http).unwrap();
    let body = fetcher
        .fetch(&format!("{}/detail/", mock_server.uri()))
        .await
        .unwrap();
    assert!(body.contains("<p>ok</p>"));
}

#[tokio::test]
async fn test_fetch_classifies_short_body_as_blocked() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri(), 1, CrawlOrder::Forward);

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(MIN_BODY - 1)))
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::new(&config.http).unwrap();
    let err = fetcher.fetch(&mock_server.uri()).await.unwrap_err();
    match err {
        FetchError::BlockedContent { length, minimum, .. } => {
            assert_eq!(length, MIN_BODY - 1);
            assert_eq!(minimum, MIN_BODY);
        }
        other => panic!("expected blocked content, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_accepts_body_at_threshold() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri(), 1, CrawlOrder::Forward);

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(MIN_BODY)))
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::new(&config.http).unwrap();
    assert!(fetcher.fetch(&mock_server.uri()).await.is_ok());
}

#[tokio::test]
async fn test_fetch_non_success_status() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri(), 1, CrawlOrder::Forward);

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_string(html_page("denied")))
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::new(&config.http).unwrap();
    let err = fetcher.fetch(&mock_server.uri()).await.unwrap_err();
    match err {
        FetchError::Status { status, .. } => assert_eq!(status.as_u16(), 403),
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_connection_failure() {
    let config = create_test_config("http://127.0.0.1:9", 1, CrawlOrder::Forward);
    let fetcher = Fetcher::new(&config.http).unwrap();

    let err = fetcher.fetch("http://127.0.0.1:9/").await.unwrap_err();
    assert!(matches!(err, FetchError::Network { .. }));
}
