//! Tests for the HTTP transport

use super::*;
use crate::auth::ApiKeyCredential;
use crate::config::ConnectorConfig;
use crate::error::Error;
use crate::request::RequestBuilder;
use crate::types::QueryMap;
use serde_json::json;
use std::time::{Duration, Instant};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport() -> HttpTransport {
    HttpTransport::new().unwrap()
}

#[test]
fn test_http_transport_config_default() {
    let config = HttpTransportConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert!(config.rate_limit.is_none());
    assert!(config.user_agent.starts_with("webinarjam-connector/"));
}

#[test]
fn test_http_transport_config_builder() {
    let config = HttpTransportConfig::builder()
        .timeout(Duration::from_secs(5))
        .rate_limit(RateLimiterConfig::new(2, 2))
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(2, 2)));
    assert_eq!(config.user_agent, "test-agent/1.0");

    let transport = HttpTransport::with_config(config).unwrap();
    assert!(transport.has_rate_limiter());
}

#[tokio::test]
async fn test_send_posts_json_body_with_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/webinarjam/webinars"))
        .and(header("Accept", "application/json"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"api_key": "k"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "webinars": [{"webinar_id": 1}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = RequestBuilder::new(mock_server.uri())
        .build_path("/webinarjam/webinars", &ApiKeyCredential::new("k"));
    let response = transport().send(&request).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body["webinars"][0]["webinar_id"], 1);
}

#[tokio::test]
async fn test_send_appends_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/webinarjam/registrants"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut query = QueryMap::new();
    query.insert("page".to_string(), "2".to_string());
    let request = RequestBuilder::new(mock_server.uri())
        .build_path("/webinarjam/registrants", &ApiKeyCredential::new("k"))
        .with_query(&query);

    let response = transport().send(&request).await.unwrap();
    assert_eq!(response.body, json!({"ok": true}));
}

#[tokio::test]
async fn test_send_maps_401_to_authentication_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
        .mount(&mock_server)
        .await;

    let request =
        RequestBuilder::new(mock_server.uri()).build_path("/x", &ApiKeyCredential::new("bad"));
    let err = transport().send(&request).await.unwrap_err();

    assert!(err.is_auth());
    assert!(err.to_string().contains("Invalid API key"));
}

#[tokio::test]
async fn test_send_maps_server_error_without_retry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request =
        RequestBuilder::new(mock_server.uri()).build_path("/x", &ApiKeyCredential::new("k"));
    let err = transport().send(&request).await.unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 503, .. }));
}

#[tokio::test]
async fn test_send_rejects_non_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&mock_server)
        .await;

    let request =
        RequestBuilder::new(mock_server.uri()).build_path("/x", &ApiKeyCredential::new("k"));
    let err = transport().send(&request).await.unwrap_err();

    assert!(matches!(err, Error::MalformedResponse { .. }));
}

#[tokio::test]
async fn test_send_empty_body_is_null() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let request =
        RequestBuilder::new(mock_server.uri()).build_path("/x", &ApiKeyCredential::new("k"));
    let response = transport().send(&request).await.unwrap();

    assert_eq!(response.status, 204);
    assert!(response.body.is_null());
}

#[tokio::test]
async fn test_send_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let transport = HttpTransport::with_config(
        HttpTransportConfig::builder()
            .timeout(Duration::from_millis(50))
            .build(),
    )
    .unwrap();
    let request =
        RequestBuilder::new(mock_server.uri()).build_path("/x", &ApiKeyCredential::new("k"));
    let err = transport.send(&request).await.unwrap_err();

    assert!(matches!(err, Error::Timeout { timeout_ms: 50 }));
}

#[test]
fn test_rate_limit_config_default_burst() {
    let config: RateLimiterConfig = serde_yaml::from_str("requests_per_second: 2").unwrap();
    assert_eq!(config, RateLimiterConfig::new(2, 1));
}

#[tokio::test]
async fn test_configured_rate_limit_paces_sends() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/webinarjam/webinars"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"webinars": []})))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = ConnectorConfig::from_yaml_str(&format!(
        "base_url: {}\nrate_limit:\n  requests_per_second: 4\n",
        mock_server.uri()
    ))
    .unwrap();
    let transport = HttpTransport::with_config(config.to_transport_config()).unwrap();
    assert!(transport.has_rate_limiter());

    let request = RequestBuilder::new(config.base_url.clone())
        .build_path("/webinarjam/webinars", &ApiKeyCredential::new("k"));

    // Burst of one at 4/s: the 2nd and 3rd sends each wait ~250ms
    let started = Instant::now();
    for _ in 0..3 {
        transport.send(&request).await.unwrap();
    }
    assert!(started.elapsed() >= Duration::from_millis(400));
}
