//! Integration tests for `HttpTransport`.
//!
//! Each test stands up a `wiremock` server so no real network traffic is
//! made. Covers status mapping, retry behaviour and header handling.

use std::time::Duration;

use reqwest::header::USER_AGENT;
use serde_json::json;
use wiremock::matchers::{header, headers, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use socialscope_scraper::{FetchOptions, HttpTransport, ScraperError, TransportConfig};

fn test_transport(max_retries: u32) -> HttpTransport {
    HttpTransport::new(&TransportConfig {
        user_agent: "socialscope-test/0.1".to_owned(),
        default_timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(5),
        max_retries,
        backoff_base_ms: 0,
    })
    .expect("failed to build test transport")
}

// ---------------------------------------------------------------------------
// Status mapping and retries
// ---------------------------------------------------------------------------

#[tokio::test]
async fn retries_server_error_then_returns_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let body = test_transport(2)
        .fetch_text(&format!("{}/page", server.uri()), &FetchOptions::new())
        .await
        .expect("expected success after one retry");
    assert_eq!(body, "<html>ok</html>");
}

#[tokio::test]
async fn not_found_is_returned_without_retrying() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_transport(3)
        .fetch_text(&format!("{}/missing", server.uri()), &FetchOptions::new())
        .await
        .unwrap_err();
    assert!(
        matches!(err, ScraperError::NotFound { .. }),
        "expected NotFound, got: {err:?}"
    );
}

#[tokio::test]
async fn forbidden_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_transport(3)
        .fetch_text(&format!("{}/walled", server.uri()), &FetchOptions::new())
        .await
        .unwrap_err();
    assert!(
        matches!(err, ScraperError::UnexpectedStatus { status: 403, .. }),
        "expected UnexpectedStatus(403), got: {err:?}"
    );
}

#[tokio::test]
async fn rate_limit_surfaces_after_exhausting_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
        .expect(3)
        .mount(&server)
        .await;

    let err = test_transport(2)
        .fetch_text(&format!("{}/busy", server.uri()), &FetchOptions::new())
        .await
        .unwrap_err();
    match err {
        ScraperError::RateLimited {
            retry_after_secs, ..
        } => assert_eq!(retry_after_secs, 7),
        other => panic!("expected RateLimited, got: {other:?}"),
    }
}

#[tokio::test]
async fn relative_url_is_rejected_before_any_request() {
    let err = test_transport(0)
        .fetch_text("/natgeo/", &FetchOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ScraperError::InvalidUrl { .. }), "got: {err:?}");
}

// ---------------------------------------------------------------------------
// Headers, query and decoding
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sends_browser_headers_and_per_request_overrides() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/headers"))
        .and(header("user-agent", "Instagram 219.0.0.12.117 Android"))
        .and(headers("accept-language", vec!["en-US", "en;q=0.9"]))
        .and(header("x-ig-app-id", "936619743392459"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let options = FetchOptions::new()
        .header(USER_AGENT, "Instagram 219.0.0.12.117 Android")
        .custom_header("x-ig-app-id", "936619743392459");
    let body = test_transport(0)
        .fetch_text(&format!("{}/headers", server.uri()), &options)
        .await
        .expect("headers should match");
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn fetch_json_appends_query_and_decodes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user/info"))
        .and(query_param("unique_id", "a b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 0})))
        .mount(&server)
        .await;

    let value = test_transport(0)
        .fetch_json(
            &format!("{}/api/user/info", server.uri()),
            &FetchOptions::new().query("unique_id", "a b"),
        )
        .await
        .expect("expected JSON body");
    assert_eq!(value["code"], 0);
}

#[tokio::test]
async fn fetch_json_reports_invalid_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_transport(2)
        .fetch_json(&format!("{}/api", server.uri()), &FetchOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ScraperError::Deserialize { .. }), "got: {err:?}");
}

#[tokio::test]
async fn per_request_timeout_is_enforced() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let err = test_transport(0)
        .fetch_text(
            &format!("{}/slow", server.uri()),
            &FetchOptions::new().timeout(Duration::from_millis(50)),
        )
        .await
        .unwrap_err();
    match err {
        ScraperError::Http(e) => assert!(e.is_timeout(), "expected timeout, got: {e:?}"),
        other => panic!("expected Http timeout, got: {other:?}"),
    }
}
