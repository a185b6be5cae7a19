//! Integration tests for `NaverNewsClient::search`.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no real
//! network traffic is made. Covers the happy path, pagination, the
//! max-results cap, exhaustion, recency filtering, and every session-start
//! error variant.

use chrono::{Duration, Utc};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use newscope_core::{RecencyWindow, SourceAdapter, SourceError};
use newscope_search::NaverNewsClient;

fn test_client(base_url: &str) -> NaverNewsClient {
    NaverNewsClient::with_base_url("test-id", "test-secret", 5, "newscope-test/0.1", base_url)
        .expect("failed to build test NaverNewsClient")
}

fn item(n: usize, pub_date: &str) -> serde_json::Value {
    json!({
        "title": format!("<b>HBM</b> 기사 {n}"),
        "originallink": format!("https://press.example.com/{n}"),
        "link": format!("https://news.example.com/{n}"),
        "description": format!("<b>HBM</b> 관련 요약 {n}"),
        "pubDate": pub_date
    })
}

fn items_body(items: Vec<serde_json::Value>) -> serde_json::Value {
    json!({
        "lastBuildDate": "Mon, 26 Sep 2016 07:50:00 +0900",
        "total": 1000,
        "start": 1,
        "display": items.len(),
        "items": items
    })
}

#[tokio::test]
async fn search_returns_articles_with_stripped_markup_and_parsed_dates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search/news.json"))
        .and(query_param("query", "HBM"))
        .and(query_param("sort", "date"))
        .and(header("X-Naver-Client-Id", "test-id"))
        .and(header("X-Naver-Client-Secret", "test-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&items_body(vec![item(
            1,
            "Mon, 26 Sep 2016 07:50:00 +0900",
        )])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let articles = client.search("HBM", 5, None).await.unwrap();

    assert_eq!(articles.len(), 1);
    let article = &articles[0];
    assert_eq!(article.source, "naver");
    assert_eq!(article.title, "HBM 기사 1");
    assert_eq!(article.url, "https://news.example.com/1");
    assert_eq!(article.body.as_text(), Some("HBM 관련 요약 1"));
    assert!(article.published_at.is_some());
    assert_eq!(article.metadata["original_link"], "https://press.example.com/1");
}

#[tokio::test]
async fn search_never_returns_more_than_max_results() {
    let server = MockServer::start().await;

    let many: Vec<_> = (0..5)
        .map(|n| item(n, "Mon, 26 Sep 2016 07:50:00 +0900"))
        .collect();
    Mock::given(method("GET"))
        .and(path("/v1/search/news.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&items_body(many)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let articles = client.search("HBM", 3, None).await.unwrap();
    assert_eq!(articles.len(), 3);
}

#[tokio::test]
async fn search_pages_until_max_results() {
    let server = MockServer::start().await;

    // First page fills the 100-item cap, second page serves the remainder.
    let first: Vec<_> = (0..100)
        .map(|n| item(n, "Mon, 26 Sep 2016 07:50:00 +0900"))
        .collect();
    Mock::given(method("GET"))
        .and(path("/v1/search/news.json"))
        .and(query_param("start", "1"))
        .and(query_param("display", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&items_body(first)))
        .mount(&server)
        .await;

    let second: Vec<_> = (100..103)
        .map(|n| item(n, "Mon, 26 Sep 2016 07:50:00 +0900"))
        .collect();
    Mock::given(method("GET"))
        .and(path("/v1/search/news.json"))
        .and(query_param("start", "101"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&items_body(second)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let articles = client.search("HBM", 103, None).await.unwrap();
    assert_eq!(articles.len(), 103);
    assert_eq!(articles[102].url, "https://news.example.com/102");
}

#[tokio::test]
async fn exhausted_source_returns_fewer_than_requested() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search/news.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&items_body(vec![
            item(1, "Mon, 26 Sep 2016 07:50:00 +0900"),
            item(2, "Mon, 26 Sep 2016 07:50:00 +0900"),
        ])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let articles = client.search("HBM", 50, None).await.unwrap();
    assert_eq!(articles.len(), 2);
}

#[tokio::test]
async fn recency_window_filters_old_results_client_side() {
    let server = MockServer::start().await;

    let recent = (Utc::now() - Duration::days(2)).to_rfc2822();
    let old = (Utc::now() - Duration::days(40)).to_rfc2822();
    Mock::given(method("GET"))
        .and(path("/v1/search/news.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&items_body(vec![
            item(1, &recent),
            item(2, &old),
        ])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let articles = client
        .search("HBM", 10, Some(RecencyWindow::Week))
        .await
        .unwrap();
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].url, "https://news.example.com/1");
}

#[tokio::test]
async fn unauthorized_maps_to_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search/news.json"))
        .respond_with(ResponseTemplate::new(401).set_body_json(&json!({
            "errorMessage": "Authentication failed",
            "errorCode": "024"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.search("HBM", 5, None).await;
    assert!(
        matches!(result, Err(SourceError::Auth(_))),
        "expected Auth, got: {result:?}"
    );
}

#[tokio::test]
async fn error_status_maps_to_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search/news.json"))
        .respond_with(ResponseTemplate::new(400).set_body_json(&json!({
            "errorMessage": "Incorrect query request",
            "errorCode": "SE01"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.search("HBM", 5, None).await;
    assert!(
        matches!(result, Err(SourceError::Api(_))),
        "expected Api, got: {result:?}"
    );
}

#[tokio::test]
async fn malformed_body_maps_to_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search/news.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.search("HBM", 5, None).await;
    assert!(
        matches!(result, Err(SourceError::Deserialize { .. })),
        "expected Deserialize, got: {result:?}"
    );
}
