//! HTTP-level integration tests for operator edits to a property's pipeline
//! state: statuses, notes, step fields, and the concurrency token.

mod common;

use axum::http::StatusCode;
use common::{body_json, insert_property, patch_json, put_json};
use sqlx::PgPool;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Closer status
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn update_closer_status(pool: PgPool) {
    let id = insert_property(&pool, None, "Mario", Some("Rossi"), "331", "Via Roma 1").await;

    let app = common::build_test_app(pool);
    let response = patch_json(
        app,
        &format!("/api/v1/properties/{id}/closer-status"),
        serde_json::json!({"closer_status": "approvato"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["closer_status"], "approvato");
    // The coarse status stays untouched; the two fields are independent.
    assert_eq!(json["data"]["status"], "pending");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_closer_status_is_rejected(pool: PgPool) {
    let id = insert_property(&pool, None, "Mario", Some("Rossi"), "331", "Via Roma 1").await;

    let app = common::build_test_app(pool);
    let response = patch_json(
        app,
        &format!("/api/v1/properties/{id}/closer-status"),
        serde_json::json!({"closer_status": "chiuso"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Coarse status
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn approving_stamps_approved_at(pool: PgPool) {
    let id = insert_property(&pool, None, "Mario", Some("Rossi"), "331", "Via Roma 1").await;

    let app = common::build_test_app(pool.clone());
    let json = body_json(
        patch_json(
            app,
            &format!("/api/v1/properties/{id}/status"),
            serde_json::json!({"status": "approved"}),
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["status"], "approved");
    assert!(json["data"]["approved_at"].is_string());

    // Reverting to pending clears the stamp.
    let app = common::build_test_app(pool);
    let json = body_json(
        patch_json(
            app,
            &format!("/api/v1/properties/{id}/status"),
            serde_json::json!({"status": "pending"}),
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["status"], "pending");
    assert!(json["data"]["approved_at"].is_null());
}

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn notes_round_trip(pool: PgPool) {
    let id = insert_property(&pool, None, "Mario", Some("Rossi"), "331", "Via Roma 1").await;

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/properties/{id}/notes"),
        serde_json::json!({"closer_notes": "Richiamare dopo le 18"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["closer_notes"], "Richiamare dopo le 18");
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn step_fields_land_in_one_update(pool: PgPool) {
    let id = insert_property(&pool, None, "Mario", Some("Rossi"), "331", "Via Roma 1").await;

    let app = common::build_test_app(pool);
    let response = patch_json(
        app,
        &format!("/api/v1/properties/{id}/steps/sopralluogo"),
        serde_json::json!({
            "stato": "organizzato",
            "data": "2026-03-20",
            "orario": "15:30",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["step_sopralluogo"], "organizzato");
    assert_eq!(json["data"]["step_sopralluogo_data"], "2026-03-20");
    assert_eq!(json["data"]["step_sopralluogo_orario"], "15:30");
    // Untouched steps keep their defaults.
    assert_eq!(json["data"]["step_chiamata"], "da_contattare");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn partial_step_edit_keeps_other_fields(pool: PgPool) {
    let id = insert_property(&pool, None, "Mario", Some("Rossi"), "331", "Via Roma 1").await;

    let app = common::build_test_app(pool.clone());
    patch_json(
        app,
        &format!("/api/v1/properties/{id}/steps/accordo"),
        serde_json::json!({"stato": "inviato", "data": "2026-04-01"}),
    )
    .await;

    let app = common::build_test_app(pool);
    let json = body_json(
        patch_json(
            app,
            &format!("/api/v1/properties/{id}/steps/accordo"),
            serde_json::json!({"orario": "10:00"}),
        )
        .await,
    )
    .await;

    assert_eq!(json["data"]["step_accordo"], "inviato");
    assert_eq!(json["data"]["step_accordo_data"], "2026-04-01");
    assert_eq!(json["data"]["step_accordo_orario"], "10:00");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn step_state_from_the_wrong_vocabulary_is_rejected(pool: PgPool) {
    let id = insert_property(&pool, None, "Mario", Some("Rossi"), "331", "Via Roma 1").await;

    let app = common::build_test_app(pool);
    let response = patch_json(
        app,
        &format!("/api/v1/properties/{id}/steps/chiamata"),
        serde_json::json!({"stato": "organizzato"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_step_is_rejected(pool: PgPool) {
    let id = insert_property(&pool, None, "Mario", Some("Rossi"), "331", "Via Roma 1").await;

    let app = common::build_test_app(pool);
    let response = patch_json(
        app,
        &format!("/api/v1/properties/{id}/steps/rogito"),
        serde_json::json!({"stato": "organizzato"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn malformed_orario_is_rejected(pool: PgPool) {
    let id = insert_property(&pool, None, "Mario", Some("Rossi"), "331", "Via Roma 1").await;

    let app = common::build_test_app(pool);
    let response = patch_json(
        app,
        &format!("/api/v1/properties/{id}/steps/sopralluogo"),
        serde_json::json!({"orario": "25:99"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn empty_step_edit_is_rejected(pool: PgPool) {
    let id = insert_property(&pool, None, "Mario", Some("Rossi"), "331", "Via Roma 1").await;

    let app = common::build_test_app(pool);
    let response = patch_json(
        app,
        &format!("/api/v1/properties/{id}/steps/sopralluogo"),
        serde_json::json!({}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Concurrency token
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn stale_concurrency_token_is_a_conflict(pool: PgPool) {
    let id = insert_property(&pool, None, "Mario", Some("Rossi"), "331", "Via Roma 1").await;

    let app = common::build_test_app(pool);
    let response = patch_json(
        app,
        &format!("/api/v1/properties/{id}/closer-status"),
        serde_json::json!({
            "closer_status": "approvato",
            "expected_updated_at": "2000-01-01T00:00:00Z",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn matching_concurrency_token_applies(pool: PgPool) {
    let id = insert_property(&pool, None, "Mario", Some("Rossi"), "331", "Via Roma 1").await;
    let updated_at: chrono::DateTime<chrono::Utc> =
        sqlx::query_scalar("SELECT updated_at FROM properties WHERE id = $1")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();

    let app = common::build_test_app(pool);
    let response = patch_json(
        app,
        &format!("/api/v1/properties/{id}/closer-status"),
        serde_json::json!({
            "closer_status": "rifiutato",
            "expected_updated_at": updated_at,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["closer_status"], "rifiutato");
}

// ---------------------------------------------------------------------------
// Missing property
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn editing_an_unknown_property_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = patch_json(
        app,
        &format!("/api/v1/properties/{}/closer-status", Uuid::new_v4()),
        serde_json::json!({"closer_status": "approvato"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
