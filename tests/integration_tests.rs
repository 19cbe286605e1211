//! Integration tests using mock HTTP server
//!
//! Tests the full flow: routing table → request builder → HTTP transport →
//! pagination → records.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::io::Write;
use webinarjam_connector::{
    ApiKeyCredential, Connector, ConnectorConfig, Error, Operation, PaginationPolicy,
    ParameterBag, Platform, Resource,
};
use wiremock::matchers::{
    body_json, body_partial_json, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helpers
// ============================================================================

fn connector(server: &MockServer) -> Connector {
    let config = ConnectorConfig::default().with_base_url(server.uri());
    Connector::from_config_with_credential(&config, ApiKeyCredential::new("test-key")).unwrap()
}

fn registrants_body(current_page: u64, next: Option<&str>, ids: &[u64]) -> Value {
    let data: Vec<Value> = ids
        .iter()
        .map(|id| json!({"lead_id": id, "email": format!("lead{id}@example.com")}))
        .collect();
    json!({
        "status": "success",
        "registrants": {
            "current_page": current_page,
            "next_page_url": next,
            "data": data
        }
    })
}

async fn mount_registrants_page(server: &MockServer, page: Option<u64>, body: Value) {
    let mock = Mock::given(method("POST")).and(path("/webinarjam/registrants"));
    let mock = match page {
        Some(page) => mock.and(query_param("page", page.to_string())),
        None => mock.and(query_param_is_missing("page")),
    };
    mock.respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

fn lead_ids(records: &[Value]) -> Vec<u64> {
    records
        .iter()
        .map(|r| r["lead_id"].as_u64().unwrap())
        .collect()
}

fn registrants_params() -> ParameterBag {
    let filters = ParameterBag::new()
        .with(
            "attendedLive",
            ParameterBag::new()
                .with("attended_live", 1)
                .with("attended_live_timestamp", "2025-01-01T00:00:00Z"),
        )
        .with("search", "example.com");

    ParameterBag::new()
        .with("webinarId", 12)
        .with("schedule", 3)
        .with("additionalRegistrantsFields", filters)
}

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn test_registrants_return_all() {
    let server = MockServer::start().await;

    mount_registrants_page(&server, None, registrants_body(1, Some("X"), &[1, 2])).await;
    mount_registrants_page(&server, Some(2), registrants_body(2, Some("Y"), &[3])).await;
    mount_registrants_page(&server, Some(3), registrants_body(3, None, &[4, 5])).await;

    let records = connector(&server)
        .execute(
            Resource::WebinarJam,
            Operation::GetRegistrants,
            registrants_params(),
            PaginationPolicy::all(),
        )
        .await
        .unwrap();

    assert_eq!(lead_ids(&records), vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_registrants_body_mapping() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/webinarjam/registrants"))
        .and(body_json(json!({
            "api_key": "test-key",
            "webinar_id": 12,
            "schedule": 3,
            "attended_live": 1,
            "attended_live_timestamp": 1_735_689_600,
            "search": "example.com"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(registrants_body(1, None, &[7])))
        .expect(1)
        .mount(&server)
        .await;

    let records = connector(&server)
        .execute(
            Resource::WebinarJam,
            Operation::GetRegistrants,
            registrants_params(),
            PaginationPolicy::default(),
        )
        .await
        .unwrap();

    assert_eq!(lead_ids(&records), vec![7]);
}

#[tokio::test]
async fn test_registrants_limit() {
    let server = MockServer::start().await;

    mount_registrants_page(&server, None, registrants_body(1, Some("X"), &[1])).await;
    mount_registrants_page(&server, Some(2), registrants_body(2, Some("Y"), &[2])).await;

    let records = connector(&server)
        .execute(
            Resource::WebinarJam,
            Operation::GetRegistrants,
            registrants_params(),
            PaginationPolicy::limited(2),
        )
        .await
        .unwrap();

    // expect(1) on each mock also verifies page 3 was never requested
    assert_eq!(lead_ids(&records), vec![1, 2]);
}

#[tokio::test]
async fn test_pages_keep_results_before_failure() {
    let server = MockServer::start().await;

    mount_registrants_page(&server, None, registrants_body(1, Some("X"), &[1])).await;
    Mock::given(method("POST"))
        .and(path("/webinarjam/registrants"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .expect(1)
        .mount(&server)
        .await;

    let connector = connector(&server);
    let mut pager = connector
        .pages(
            Resource::WebinarJam,
            Operation::GetRegistrants,
            registrants_params(),
            PaginationPolicy::all(),
        )
        .unwrap();

    let first = pager.next_page().await.unwrap().unwrap();
    assert_eq!(lead_ids(&first.records), vec![1]);

    let err = pager.next_page().await.unwrap().unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 502, .. }));
    assert!(pager.next_page().await.is_none());
    assert_eq!(pager.pages_fetched(), 1);
}

// ============================================================================
// Other operations
// ============================================================================

#[tokio::test]
async fn test_register_state_overwrites_country() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/everwebinar/register"))
        .and(body_partial_json(json!({
            "api_key": "test-key",
            "webinar_id": 5,
            "email": "ada@example.com",
            "first_name": "Ada",
            "country": "CA"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "user": {"lead_id": 99}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let params = ParameterBag::new()
        .with("webinarId", 5)
        .with("schedule", 1)
        .with("email", "ada@example.com")
        .with("firstName", "Ada")
        .with(
            "additionalRegisterFields",
            ParameterBag::new().with("country", "US").with("state", "CA"),
        );

    let records = connector(&server)
        .execute(
            Resource::EverWebinar,
            Operation::Register,
            params,
            PaginationPolicy::default(),
        )
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["user"]["lead_id"], 99);
}

#[tokio::test]
async fn test_get_countries() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/webinarjam/countries"))
        .and(body_json(json!({"api_key": "test-key"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "countries": [{"code": "US"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let records = connector(&server)
        .execute(
            Resource::General,
            Operation::GetCountries,
            ParameterBag::new(),
            PaginationPolicy::default(),
        )
        .await
        .unwrap();

    assert_eq!(records[0]["countries"][0]["code"], "US");
}

// ============================================================================
// Credential check
// ============================================================================

#[tokio::test]
async fn test_check_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/everwebinar/webinars"))
        .and(body_json(json!({"api_key": "test-key"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"webinars": []})))
        .expect(1)
        .mount(&server)
        .await;

    let result = connector(&server).check(Platform::EverWebinar).await;
    assert!(result.success);
}

#[tokio::test]
async fn test_check_rejected_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/webinarjam/webinars"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
        .expect(1)
        .mount(&server)
        .await;

    let result = connector(&server).check(Platform::WebinarJam).await;
    assert!(!result.success);
    assert!(result.message.unwrap().contains("Authentication failed"));
}

// ============================================================================
// Config
// ============================================================================

#[tokio::test]
async fn test_config_file_with_extra_table() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/webinarjam/webinars"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"webinars": [1]})))
        .expect(1)
        .mount(&server)
        .await;

    let mut table = tempfile::NamedTempFile::new().unwrap();
    write!(
        table,
        r"name: override
operations:
  - resource: webinarJam
    operation: getMany
    path: /v2/webinarjam/webinars
"
    )
    .unwrap();

    let mut config_file = tempfile::NamedTempFile::new().unwrap();
    write!(
        config_file,
        "base_url: {}\ntimeout_secs: 5\napi_key: file-key\ncatalog: {}\n",
        server.uri(),
        table.path().display()
    )
    .unwrap();

    let config = ConnectorConfig::from_file(config_file.path()).unwrap();
    let connector = Connector::from_config_with_credential(
        &config,
        config.credential_with_env(None).unwrap(),
    )
    .unwrap();

    assert_eq!(connector.catalog().len(), 11);

    let records = connector
        .execute(
            Resource::WebinarJam,
            Operation::GetMany,
            ParameterBag::new(),
            PaginationPolicy::default(),
        )
        .await
        .unwrap();
    assert_eq!(records, vec![json!({"webinars": [1]})]);
}
