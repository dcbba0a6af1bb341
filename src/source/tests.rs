//! Tests for the batch source

use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A search response envelope with the given total-hit count and docs
fn search_body(hits: u64, docs: serde_json::Value) -> serde_json::Value {
    json!({"response": {"meta": {"hits": hits}, "docs": docs}})
}

/// A test context pointed at the mock server, with pacing disabled
fn test_context(uri: &str) -> QueryContext {
    QueryContext::new("test keyword", "test-key")
        .with_base_url(uri)
        .with_pacing_interval_secs(0)
}

// ============================================================================
// Construction and Lifecycle
// ============================================================================

#[tokio::test]
async fn test_connect_records_incremental_hints() {
    let mut source = ArticleSource::new(QueryContext::new("k", "key"));

    source.connect(Some("updated_at"), Some("2026-01-01"));
    let debug = format!("{source:?}");
    assert!(debug.contains("updated_at"));
    assert!(debug.contains("2026-01-01"));

    // Disconnect is a no-op and always succeeds
    source.disconnect();
}

#[tokio::test]
async fn test_next_batch_rejects_zero_batch_size() {
    let mut source = ArticleSource::new(QueryContext::new("k", "key"));
    let err = source.next_batch(0).await.unwrap_err();
    assert!(matches!(err, Error::InvalidBatchSize));
}

// ============================================================================
// Fetch Behavior
// ============================================================================

#[tokio::test]
async fn test_missing_hits_on_first_fetch_is_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"response": {"docs": [{"a": 1}]}})),
        )
        .mount(&mock_server)
        .await;

    let mut source = ArticleSource::new(test_context(&mock_server.uri()));
    let err = source.next_batch(1).await.unwrap_err();

    match err {
        Error::MalformedResponse { field } => assert_eq!(field, "response.meta.hits"),
        other => panic!("Expected MalformedResponse, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_hits_on_later_fetch_is_tolerated() {
    let mock_server = MockServer::start().await;

    // First page carries the total; the second omits meta entirely
    Mock::given(method("GET"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(
            4,
            json!([{"id": 1}, {"id": 2}]),
        )))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"response": {"docs": [{"id": 3}, {"id": 4}]}})),
        )
        .mount(&mock_server)
        .await;

    let mut source = ArticleSource::new(test_context(&mock_server.uri()));
    assert_eq!(source.next_batch(2).await.unwrap().unwrap().len(), 2);
    assert_eq!(source.next_batch(2).await.unwrap().unwrap().len(), 2);
    assert_eq!(source.next_batch(2).await.unwrap(), None);
}

#[tokio::test]
async fn test_missing_docs_is_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"response": {"meta": {"hits": 10}}})),
        )
        .mount(&mock_server)
        .await;

    let mut source = ArticleSource::new(test_context(&mock_server.uri()));
    let err = source.next_batch(1).await.unwrap_err();

    match err {
        Error::MalformedResponse { field } => assert_eq!(field, "response.docs"),
        other => panic!("Expected MalformedResponse, got {other:?}"),
    }
}

#[tokio::test]
async fn test_call_count_tracks_fetches() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("page", "0"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(search_body(2, json!([{"id": 1}]))),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(search_body(2, json!([{"id": 2}]))),
        )
        .mount(&mock_server)
        .await;

    let mut source = ArticleSource::new(test_context(&mock_server.uri()));
    assert_eq!(source.call_count(), 0);

    source.next_batch(2).await.unwrap().unwrap();
    assert_eq!(source.call_count(), 2);
    assert_eq!(source.remaining(), Some(0));
}

#[tokio::test]
async fn test_overshoot_saturates_remaining_at_zero() {
    let mock_server = MockServer::start().await;

    // The API reports 3 hits but the page carries 5 docs
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(
            3,
            json!([{"id": 1}, {"id": 2}, {"id": 3}, {"id": 4}, {"id": 5}]),
        )))
        .mount(&mock_server)
        .await;

    let mut source = ArticleSource::new(test_context(&mock_server.uri()));

    let batch = source.next_batch(3).await.unwrap().unwrap();
    assert_eq!(batch.len(), 3);
    assert_eq!(source.remaining(), Some(0));

    // The two overshoot records are a leftover smaller than one batch
    assert_eq!(source.next_batch(3).await.unwrap(), None);
}

#[tokio::test]
async fn test_next_batch_after_completion_stays_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(search_body(1, json!([{"id": 1}]))),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut source = ArticleSource::new(test_context(&mock_server.uri()));
    assert_eq!(source.next_batch(1).await.unwrap().unwrap().len(), 1);
    assert_eq!(source.next_batch(1).await.unwrap(), None);
    // Completion is sticky: no further requests are issued
    assert_eq!(source.next_batch(1).await.unwrap(), None);
}

// ============================================================================
// Schema
// ============================================================================

#[tokio::test]
async fn test_schema_fetches_once_and_does_not_consume() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(
            1,
            json!([{"_id": "doc-1", "headline": {"main": "Hello"}, "keywords": [{"value": "rust"}]}]),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut source = ArticleSource::new(test_context(&mock_server.uri()));

    let schema = source.schema().await.unwrap();
    assert_eq!(schema, ["_id", "headline.main", "keywords.0.value"]);
    assert_eq!(source.buffered(), 1);

    // The peeked record is still available for batch production
    let batch = source.next_batch(1).await.unwrap().unwrap();
    assert_eq!(batch[0].get("_id"), Some(&json!("doc-1")));
}

#[tokio::test]
async fn test_schema_with_no_records_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(0, json!([]))))
        .mount(&mock_server)
        .await;

    let mut source = ArticleSource::new(test_context(&mock_server.uri()));
    let err = source.schema().await.unwrap_err();
    assert!(matches!(err, Error::Schema { .. }));
}
