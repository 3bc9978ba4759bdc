//! End-to-end tests of the HTTP surface over the in-memory record store.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use axum::http::{StatusCode, header};
use axum_test::TestServer;
use registration_core::batch::RegistrationResponse;
use registration_core::processor::{DuplicateCodePolicy, RegistrationProcessor};
use registration_core::store::StoreError;
use registration_testing::fixtures::{self, INSCRIPTION_TABLE, VALIDATION_TABLE};
use registration_testing::{InMemoryRecordStore, Operation, init_tracing, test_clock};
use registration_web::handlers::registration::{METHOD_NOT_ALLOWED_MESSAGE, SUCCESS_MESSAGE};
use registration_web::{AppState, CORRELATION_ID_HEADER, REGISTER_PATH, build_router};
use serde_json::{Value, json};
use std::sync::Arc;

fn server_with(store: &InMemoryRecordStore, policy: DuplicateCodePolicy) -> TestServer {
    init_tracing();
    let processor = RegistrationProcessor::new(
        Arc::new(store.clone()),
        Arc::new(test_clock()),
        fixtures::processor_config().with_duplicate_codes(policy),
    );
    TestServer::new(build_router(AppState::new(Arc::new(processor)))).unwrap()
}

fn server(store: &InMemoryRecordStore) -> TestServer {
    server_with(store, DuplicateCodePolicy::Merge)
}

#[tokio::test]
async fn test_accepted_batch_returns_message_and_count() {
    let store = InMemoryRecordStore::new();
    store.seed_ledger(VALIDATION_TABLE, &[("ABC123", false), ("DEF456", false)]);

    let response = server(&store)
        .post(REGISTER_PATH)
        .json(&fixtures::batch(&["ABC123", "DEF456"]))
        .await;

    response.assert_status_ok();
    let body: RegistrationResponse = response.json();
    assert_eq!(body.message, SUCCESS_MESSAGE);
    assert_eq!(body.record_count, 2);
    assert_eq!(store.rows(INSCRIPTION_TABLE).len(), 2);
}

#[tokio::test]
async fn test_success_body_uses_camel_case_count() {
    let store = InMemoryRecordStore::new();
    store.seed_ledger(VALIDATION_TABLE, &[("ABC123", false)]);

    let response = server(&store)
        .post(REGISTER_PATH)
        .json(&fixtures::batch(&["ABC123"]))
        .await;

    let body: Value = response.json();
    assert_eq!(body["recordCount"], json!(1));
}

#[tokio::test]
async fn test_consumed_code_is_conflict_naming_the_code() {
    let store = InMemoryRecordStore::new();
    store.seed_ledger(VALIDATION_TABLE, &[("ABC123", true)]);

    let response = server(&store)
        .post(REGISTER_PATH)
        .json(&fixtures::batch(&["ABC123"]))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["code"], "CONFLICT");
    assert!(body["message"].as_str().unwrap().contains("ABC123"));
    assert!(store.rows(INSCRIPTION_TABLE).is_empty());
}

#[tokio::test]
async fn test_unknown_code_is_conflict() {
    let store = InMemoryRecordStore::new();
    store.seed_ledger(VALIDATION_TABLE, &[("ABC123", false)]);

    let response = server(&store)
        .post(REGISTER_PATH)
        .json(&fixtures::batch(&["ABC123", "NOPE00"]))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert!(body["message"].as_str().unwrap().contains("NOPE00"));
    assert_eq!(store.is_code_consumed(VALIDATION_TABLE, "ABC123"), Some(false));
}

#[tokio::test]
async fn test_second_submission_of_same_code_is_conflict() {
    let store = InMemoryRecordStore::new();
    store.seed_ledger(VALIDATION_TABLE, &[("ABC123", false)]);
    let server = server(&store);

    server
        .post(REGISTER_PATH)
        .json(&fixtures::batch(&["ABC123"]))
        .await
        .assert_status_ok();
    server
        .post(REGISTER_PATH)
        .json(&fixtures::batch(&["ABC123"]))
        .await
        .assert_status(StatusCode::CONFLICT);

    assert_eq!(store.rows(INSCRIPTION_TABLE).len(), 1);
}

#[tokio::test]
async fn test_empty_participants_is_bad_request() {
    let store = InMemoryRecordStore::new();

    let response = server(&store)
        .post(REGISTER_PATH)
        .json(&fixtures::batch(&[]))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "BAD_REQUEST");
    assert_eq!(store.calls(Operation::Select), 0);
}

#[tokio::test]
async fn test_missing_billing_is_bad_request() {
    let store = InMemoryRecordStore::new();
    let mut batch = serde_json::to_value(fixtures::batch(&["ABC123"])).unwrap();
    batch.as_object_mut().unwrap().remove("billingData");

    server(&store)
        .post(REGISTER_PATH)
        .json(&batch)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_undecodable_body_is_bad_request() {
    let store = InMemoryRecordStore::new();
    let server = server(&store);

    let response = server
        .post(REGISTER_PATH)
        .bytes("{\"participants\": [".into())
        .content_type("application/json")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["message"].as_str().unwrap().starts_with("Invalid request body"));

    server
        .post(REGISTER_PATH)
        .json(&json!({"participants": "not a list"}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_is_method_not_allowed() {
    let store = InMemoryRecordStore::new();

    let response = server(&store).get(REGISTER_PATH).await;

    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers().get(header::ALLOW).unwrap(), "POST");
    let body: Value = response.json();
    assert_eq!(body["message"], METHOD_NOT_ALLOWED_MESSAGE);
}

#[tokio::test]
async fn test_store_failure_is_internal_error() {
    let store = InMemoryRecordStore::new();
    store.seed_ledger(VALIDATION_TABLE, &[("ABC123", false)]);
    store.fail_next(Operation::Create, StoreError::Other("disk on fire".into()));

    let response = server(&store)
        .post(REGISTER_PATH)
        .json(&fixtures::batch(&["ABC123"]))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["code"], "INTERNAL_SERVER_ERROR");
    assert_eq!(store.is_code_consumed(VALIDATION_TABLE, "ABC123"), Some(false));
}

#[tokio::test]
async fn test_reject_policy_turns_repeats_into_conflict() {
    let store = InMemoryRecordStore::new();
    store.seed_ledger(VALIDATION_TABLE, &[("ABC123", false)]);

    let response = server_with(&store, DuplicateCodePolicy::Reject)
        .post(REGISTER_PATH)
        .json(&fixtures::batch(&["ABC123", "ABC123"]))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert!(store.rows(INSCRIPTION_TABLE).is_empty());
}

#[tokio::test]
async fn test_health_check() {
    let store = InMemoryRecordStore::new();

    let response = server(&store).get("/health").await;

    response.assert_status_ok();
    response.assert_text("ok");
}

#[tokio::test]
async fn test_every_response_carries_correlation_id() {
    let store = InMemoryRecordStore::new();
    let server = server(&store);

    let generated = server.get("/health").await;
    assert!(generated.headers().get(CORRELATION_ID_HEADER).is_some());

    let echoed = server
        .get(REGISTER_PATH)
        .add_header(
            header::HeaderName::from_static("x-correlation-id"),
            header::HeaderValue::from_static("req-42"),
        )
        .await;
    assert_eq!(echoed.headers().get(CORRELATION_ID_HEADER).unwrap(), "req-42");
}
