//! Notion query API contract tests.
//!
//! A wiremock server stands in for api.notion.com; the real client talks to
//! it over HTTP.

use std::time::Duration;

use notion_sync::config::SourceConfig;
use notion_sync::error::SourceError;
use notion_sync::source::NotionClient;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const QUERY_PATH: &str = "/v1/databases/db123/query";

fn client(server: &MockServer) -> NotionClient {
    NotionClient::new(SourceConfig::new("secret_test", "db123").with_api_url(server.uri()))
}

fn page(id: &str) -> Value {
    json!({
        "object": "page",
        "id": id,
        "properties": {
            "Name": { "type": "title", "title": [{ "text": { "content": id } }] }
        }
    })
}

fn results(ids: &[&str], next_cursor: Option<&str>) -> Value {
    json!({
        "object": "list",
        "results": ids.iter().map(|id| page(id)).collect::<Vec<_>>(),
        "has_more": next_cursor.is_some(),
        "next_cursor": next_cursor,
    })
}

#[tokio::test]
async fn request_carries_auth_and_version_headers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(header("authorization", "Bearer secret_test"))
        .and(header("notion-version", "2022-06-28"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "page_size": 100 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(results(&["a1"], None)))
        .expect(1)
        .mount(&server)
        .await;

    let records = client(&server).fetch_all().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "a1");
}

#[tokio::test]
async fn follows_cursors_across_pages_in_order() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(body_json(json!({ "page_size": 100 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(results(&["a1", "a2"], Some("c1"))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(body_partial_json(json!({ "start_cursor": "c1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(results(&["a3"], Some("c2"))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(body_partial_json(json!({ "start_cursor": "c2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(results(&["a4", "a5"], None)))
        .expect(1)
        .mount(&server)
        .await;

    let records = client(&server).fetch_all().await.unwrap();
    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["a1", "a2", "a3", "a4", "a5"]);
}

#[tokio::test]
async fn has_more_without_cursor_stops() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [page("a1")],
            "has_more": true,
            "next_cursor": null,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let records = client(&server).fetch_all().await.unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn empty_database_returns_no_records() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client(&server).fetch_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn error_status_surfaces_notion_code_and_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "object": "error",
            "status": 401,
            "code": "unauthorized",
            "message": "API token is invalid."
        })))
        .mount(&server)
        .await;

    let err = client(&server).fetch_all().await.unwrap_err();
    match err {
        SourceError::Status {
            status,
            code,
            message,
        } => {
            assert_eq!(status, 401);
            assert_eq!(code, "unauthorized");
            assert_eq!(message, "API token is invalid.");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn failure_on_a_later_page_aborts_the_fetch() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(body_json(json!({ "page_size": 100 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(results(&["a1"], Some("c1"))))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(body_partial_json(json!({ "start_cursor": "c1" })))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = client(&server).fetch_all().await.unwrap_err();
    assert!(matches!(err, SourceError::Status { status: 502, ref message, .. } if message == "bad gateway"));
}

#[tokio::test]
async fn malformed_body_is_an_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client(&server).fetch_all().await.unwrap_err();
    assert!(matches!(err, SourceError::InvalidResponse { .. }));
}

#[tokio::test]
async fn repeated_cursor_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(body_json(json!({ "page_size": 100 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(results(&["a1"], Some("c1"))))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(body_partial_json(json!({ "start_cursor": "c1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(results(&["a2"], Some("c1"))))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server).fetch_all().await.unwrap_err();
    assert!(matches!(err, SourceError::RepeatedCursor { ref cursor } if cursor == "c1"));
}

#[tokio::test]
async fn cursor_cycle_across_pages_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(body_json(json!({ "page_size": 100 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(results(&["a1"], Some("c1"))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(body_partial_json(json!({ "start_cursor": "c1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(results(&["a2"], Some("c2"))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(body_partial_json(json!({ "start_cursor": "c2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(results(&["a3"], Some("c1"))))
        .expect(1)
        .mount(&server)
        .await;

    let err = tokio::time::timeout(Duration::from_secs(5), client(&server).fetch_all())
        .await
        .expect("fetch_all should stop on a cursor cycle")
        .unwrap_err();
    assert!(matches!(err, SourceError::RepeatedCursor { ref cursor } if cursor == "c1"));
}

#[tokio::test]
async fn unreachable_server_is_an_http_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = NotionClient::new(SourceConfig::new("secret_test", "db123").with_api_url(uri));
    let err = client.fetch_all().await.unwrap_err();
    assert!(matches!(err, SourceError::Http { .. }));
}
