//! Tests for the HTTP client module

use super::*;
use crate::config::TapConfig;
use crate::error::Error;
use crate::types::{BackoffType, QueryParams};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer, max_retries: u32) -> HttpClient {
    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .max_retries(max_retries)
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(1),
            Duration::from_millis(5),
        )
        .no_rate_limit()
        .build();
    HttpClient::with_config(config).unwrap()
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.max_retries, 3);
    assert!(config.base_url.is_none());
    assert!(config.rate_limit.is_some());
    assert!(config.user_agent.starts_with("tap-chameleon/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://api.example.com")
        .timeout(Duration::from_secs(60))
        .max_retries(5)
        .backoff(
            BackoffType::Linear,
            Duration::from_millis(200),
            Duration::from_secs(30),
        )
        .header("X-Custom", "value")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.base_url, Some("https://api.example.com".to_string()));
    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.max_retries, 5);
    assert_eq!(config.backoff_type, BackoffType::Linear);
    assert_eq!(config.initial_backoff, Duration::from_millis(200));
    assert_eq!(config.max_backoff, Duration::from_secs(30));
    assert_eq!(
        config.default_headers.get("X-Custom"),
        Some(&"value".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_config_for_tap() {
    let tap = TapConfig {
        api_base_url: "http://localhost:1234".to_string(),
        api_account_secret: Some("s1".to_string()),
        ..Default::default()
    };
    let config = HttpClientConfig::for_tap(&tap);
    assert_eq!(config.base_url.as_deref(), Some("http://localhost:1234"));
    assert_eq!(
        config.default_headers.get("X-Account-Secret"),
        Some(&"s1".to_string())
    );

    let config = HttpClientConfigBuilder::from_config(config).max_retries(0).build();
    assert_eq!(config.max_retries, 0);
    assert_eq!(config.base_url.as_deref(), Some("http://localhost:1234"));
}

#[test]
fn test_calculate_backoff() {
    let config = HttpClientConfig::builder()
        .backoff(
            BackoffType::Exponential,
            Duration::from_millis(100),
            Duration::from_millis(500),
        )
        .build();
    let client = HttpClient::with_config(config).unwrap();

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(1), Duration::from_millis(200));
    assert_eq!(client.calculate_backoff(2), Duration::from_millis(400));
    assert_eq!(client.calculate_backoff(3), Duration::from_millis(500));

    let config = HttpClientConfig::builder()
        .backoff(
            BackoffType::Linear,
            Duration::from_millis(100),
            Duration::from_secs(1),
        )
        .build();
    let client = HttpClient::with_config(config).unwrap();
    assert_eq!(client.calculate_backoff(2), Duration::from_millis(300));
}

#[tokio::test]
async fn test_get_json_with_headers_and_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/analyze/responses"))
        .and(header("Accept", "application/json"))
        .and(header("X-Account-Secret", "s1"))
        .and(query_param("id", "42"))
        .and(query_param("expand[profile]", "all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"responses": []})))
        .expect(1)
        .mount(&server)
        .await;

    let tap = TapConfig {
        api_base_url: server.uri(),
        api_account_secret: Some("s1".to_string()),
        ..Default::default()
    };
    let config = HttpClientConfigBuilder::from_config(HttpClientConfig::for_tap(&tap))
        .no_rate_limit()
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let mut query = QueryParams::new();
    query.insert("id".to_string(), "42".to_string());
    query.insert("expand[profile]".to_string(), "all".to_string());

    let body = client
        .get_json("/v3/analyze/responses", &query)
        .await
        .unwrap();
    assert_eq!(body, json!({"responses": []}));
}

#[tokio::test]
async fn test_retry_on_500_then_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let client = test_client(&server, 3);
    let body = client.get_json("/flaky", &QueryParams::new()).await.unwrap();
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_retries_exhausted_is_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server, 2);
    let err = client
        .get_json("/down", &QueryParams::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 503, .. }));
    assert_eq!(err.kind(), crate::error::ErrorKind::Transport);
}

#[tokio::test]
async fn test_client_error_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/secret"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad secret"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server, 3);
    let err = client
        .get_json("/secret", &QueryParams::new())
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "bad secret");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_non_json_body_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let client = test_client(&server, 0);
    let err = client
        .get_json("/html", &QueryParams::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}
