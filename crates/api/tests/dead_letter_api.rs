//! HTTP-level tests for `/api/v1/sync/dead-letters`.

mod common;

use axum::http::StatusCode;
use common::{build_test_app, delete, expect_json, get, post, test_state};
use hrsync_db::models::dead_letter::CreateDeadLetter;
use hrsync_db::repositories::DeadLetterRepo;
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn letter(topic: &str, offset: i64, payload: &str) -> CreateDeadLetter {
    CreateDeadLetter {
        topic: topic.to_string(),
        partition: 0,
        message_offset: offset,
        payload: payload.to_string(),
        error: "Missing reference for PayrollCompany".to_string(),
        attempts: 5,
    }
}

async fn park(pool: &PgPool, input: CreateDeadLetter) -> i64 {
    DeadLetterRepo::create(pool, &input).await.unwrap().id
}

const COMPANY_PAYLOAD: &str = r#"{"id":1,"name":"Acme"}"#;

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_dead_letters_paginates(pool: PgPool) {
    for offset in 0..3 {
        park(&pool, letter("event.PayrollCompany.created", offset, COMPANY_PAYLOAD)).await;
    }
    let app = build_test_app(test_state(pool));

    let json = expect_json(
        get(app, "/api/v1/sync/dead-letters?limit=2").await,
        StatusCode::OK,
    )
    .await;
    let page = json["data"].as_array().unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0]["topic"], "event.PayrollCompany.created");
    assert_eq!(page[0]["attempts"], 5);
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_replay_applies_and_removes_letter(pool: PgPool) {
    let id = park(&pool, letter("event.PayrollCompany.created", 7, COMPANY_PAYLOAD)).await;
    let state = test_state(pool.clone());

    let uri = format!("/api/v1/sync/dead-letters/{id}/replay");
    let json = expect_json(post(build_test_app(state.clone()), &uri).await, StatusCode::OK).await;
    assert_eq!(json["data"]["status"], "applied");
    assert_eq!(json["data"]["outcome"]["action"], "upserted");

    assert!(DeadLetterRepo::find_by_id(&pool, id).await.unwrap().is_none());
    let record = expect_json(
        get(build_test_app(state), "/api/v1/mirror/payroll-company/1").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(record["data"]["name"], "Acme");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_replay_keeps_letter_and_bumps_attempts(pool: PgPool) {
    // Department 42 belongs to company 1, which is not mirrored.
    let payload = json!({ "id": 42, "code": "HR", "name": "Human Resources", "companyId": 1 });
    let id = park(
        &pool,
        letter("event.Department.created", 3, &payload.to_string()),
    )
    .await;
    let app = build_test_app(test_state(pool.clone()));

    let uri = format!("/api/v1/sync/dead-letters/{id}/replay");
    let json = expect_json(post(app, &uri).await, StatusCode::OK).await;
    assert_eq!(json["data"]["status"], "failed");
    assert_eq!(json["data"]["dead_letter"]["attempts"], 6);

    let stored = DeadLetterRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(stored.attempts, 6);
    assert!(stored.error.contains("Missing reference"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_replay_of_malformed_payload_fails(pool: PgPool) {
    let id = park(&pool, letter("event.PayrollCompany.created", 1, "{not json")).await;
    let app = build_test_app(test_state(pool.clone()));

    let uri = format!("/api/v1/sync/dead-letters/{id}/replay");
    let json = expect_json(post(app, &uri).await, StatusCode::OK).await;
    assert_eq!(json["data"]["status"], "failed");
    assert!(json["data"]["error"].as_str().unwrap().contains("Malformed JSON"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_replay_refuses_to_overwrite_newer_record(pool: PgPool) {
    let id = park(&pool, letter("event.PayrollCompany.modified", 4, COMPANY_PAYLOAD)).await;
    let state = test_state(pool.clone());
    state
        .registry
        .dispatch(
            "event.PayrollCompany.modified",
            json!({ "id": 1, "name": "Acme Holdings" }),
        )
        .await
        .unwrap();

    let uri = format!("/api/v1/sync/dead-letters/{id}/replay");
    let json = expect_json(
        post(build_test_app(state.clone()), &uri).await,
        StatusCode::CONFLICT,
    )
    .await;
    assert_eq!(json["code"], "STALE_REPLAY");
    assert!(DeadLetterRepo::find_by_id(&pool, id).await.unwrap().is_some());

    let record = expect_json(
        get(build_test_app(state.clone()), "/api/v1/mirror/payroll-company/1").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(record["data"]["name"], "Acme Holdings");

    let forced = format!("{uri}?force=true");
    let json = expect_json(post(build_test_app(state), &forced).await, StatusCode::OK).await;
    assert_eq!(json["data"]["status"], "applied");
    assert!(DeadLetterRepo::find_by_id(&pool, id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_replay_unknown_letter_is_404(pool: PgPool) {
    let app = build_test_app(test_state(pool));
    let json = expect_json(
        post(app, "/api/v1/sync/dead-letters/999/replay").await,
        StatusCode::NOT_FOUND,
    )
    .await;
    assert_eq!(json["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Discard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_dead_letter(pool: PgPool) {
    let id = park(&pool, letter("event.PayrollCompany.created", 2, COMPANY_PAYLOAD)).await;
    let state = test_state(pool);

    let uri = format!("/api/v1/sync/dead-letters/{id}");
    let response = delete(build_test_app(state.clone()), &uri).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let again = delete(build_test_app(state), &uri).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}
