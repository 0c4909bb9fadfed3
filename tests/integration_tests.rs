//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: config → authenticated page requests →
//! Link header pagination → decoded records

use futures::StreamExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use tap_okta::decode::JsonDecoder;
use tap_okta::error::Error;
use tap_okta::state::HighWaterMark;
use tap_okta::streams::StreamDefinition;
use tap_okta::{
    HttpPageSource, PaginationDriver, ReplicationState, RequestParameterAssembler, TapConfig,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer, extra: serde_json::Value) -> TapConfig {
    let mut value = json!({
        "api_url": server.uri(),
        "api_key": "00test-token",
        "max_retries": 2
    });
    if let (Some(base), Some(extra)) = (value.as_object_mut(), extra.as_object()) {
        base.extend(extra.clone());
    }
    TapConfig::from_value(value).unwrap()
}

fn users_driver(config: &TapConfig) -> PaginationDriver<HttpPageSource> {
    let users = StreamDefinition::users();
    let source = HttpPageSource::with_decoder(
        config.build_client().unwrap(),
        JsonDecoder::with_path(&users.records_path),
    );
    let assembler = RequestParameterAssembler::new(config.page_size)
        .with_replication_key(users.replication_key.unwrap());
    PaginationDriver::new(source, users.path, assembler)
        .with_replication_state(config.start_date)
}

fn link_next(url: &str) -> String {
    format!(r#"<{url}>; rel="next""#)
}

// ============================================================================
// Pagination End-to-End
// ============================================================================

#[tokio::test]
async fn test_two_pages_then_done() {
    let server = MockServer::start().await;
    let next = format!("{}/users?after=abc", server.uri());

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("after", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "u4", "lastUpdated": "2024-01-04T00:00:00.000Z"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("link", link_next(&next).as_str())
                .set_body_json(json!([
                    {"id": "u1", "lastUpdated": "2024-01-01T00:00:00.000Z"},
                    {"id": "u2", "lastUpdated": "2024-01-02T00:00:00.000Z"},
                    {"id": "u3", "lastUpdated": "2024-01-03T00:00:00.000Z"}
                ])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = config(&server, json!({}));
    let records: Vec<_> = users_driver(&config).into_records().collect().await;

    let ids: Vec<_> = records
        .into_iter()
        .map(|r| r.unwrap()["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["u1", "u2", "u3", "u4"]);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let first = requests[0].url.query().unwrap_or_default().to_string();
    assert_eq!(first, "limit=10&sort=asc&order_by=lastUpdated&format=json");
}

#[tokio::test]
async fn test_repeated_cursor_raises_loop_error() {
    let server = MockServer::start().await;
    let repeated = format!("{}/users?after=xyz", server.uri());

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("after", "xyz"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("link", link_next(&repeated).as_str())
                .set_body_json(json!([{"id": "dup"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("link", link_next(&repeated).as_str())
                .set_body_json(json!([{"id": "a"}, {"id": "b"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = config(&server, json!({}));
    let mut stream = users_driver(&config).into_records();

    let mut ids = Vec::new();
    let mut failure = None;
    while let Some(item) = stream.next().await {
        match item {
            Ok(record) => ids.push(record["id"].as_str().unwrap().to_string()),
            Err(e) => failure = Some(e),
        }
    }

    assert_eq!(ids, vec!["a", "b"]);
    match failure {
        Some(Error::PaginationLoop { cursor, page_count }) => {
            assert_eq!(cursor, repeated);
            assert_eq!(page_count, 2);
        }
        other => panic!("Expected PaginationLoop, got {other:?}"),
    }
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

// ============================================================================
// Incremental Filter
// ============================================================================

#[tokio::test]
async fn test_start_date_becomes_encoded_filter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param(
            "filter",
            r#"lastUpdated gt "2024-01-01T00:00:00.000Z""#,
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let config = config(&server, json!({"start_date": "2024-01-01T00:00:00+0000"}));
    let records: Vec<_> = users_driver(&config).into_records().collect().await;
    assert!(records.is_empty());

    let requests = server.received_requests().await.unwrap();
    let query = requests[0].url.query().unwrap_or_default().to_string();
    assert!(
        query.ends_with("filter=lastUpdated%20gt%20%222024-01-01T00:00:00.000Z%22"),
        "unexpected query: {query}"
    );
}

#[tokio::test]
async fn test_high_water_mark_from_extracted_records() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "u1", "lastUpdated": "2024-05-01T08:00:00.000Z"},
            {"id": "u2", "lastUpdated": "2024-05-03T08:00:00.000Z"},
            {"id": "u3", "lastUpdated": "2024-05-02T08:00:00.000Z"}
        ])))
        .mount(&server)
        .await;

    let config = config(&server, json!({}));
    let mut mark = HighWaterMark::new("lastUpdated", None);
    let mut stream = users_driver(&config).into_records();
    while let Some(record) = stream.next().await {
        mark.observe(&record.unwrap());
    }

    assert_eq!(
        mark.value(),
        Some(ReplicationState::parse("2024-05-03T08:00:00Z").unwrap())
    );
}

// ============================================================================
// Transport
// ============================================================================

#[tokio::test]
async fn test_ssws_authorization_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(header("authorization", "SSWS 00test-token"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "u1"}])))
        .expect(1)
        .mount(&server)
        .await;

    let config = config(&server, json!({}));
    let records: Vec<_> = users_driver(&config).into_records().collect().await;
    assert_eq!(records.len(), 1);
    assert!(records[0].is_ok());
}

#[tokio::test]
async fn test_transient_failure_is_retried_inside_page_source() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "u1"}])))
        .mount(&server)
        .await;

    let config = config(&server, json!({}));
    let records: Vec<_> = users_driver(&config).into_records().collect().await;

    assert_eq!(records.len(), 1);
    assert!(records[0].is_ok());
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_client_error_ends_stream() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errorCode": "E0000011",
            "errorSummary": "Invalid token provided"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config(&server, json!({}));
    let records: Vec<_> = users_driver(&config).into_records().collect().await;

    assert_eq!(records.len(), 1);
    match &records[0] {
        Err(Error::HttpStatus { status, body }) => {
            assert_eq!(*status, 401);
            assert!(body.contains("E0000011"));
        }
        other => panic!("Expected HttpStatus, got {other:?}"),
    }
}
