//! Handlers for operator edits to a property's pipeline state.
//!
//! Each endpoint is a field-scoped update against store B. Updates carry an
//! optional `expected_updated_at` token: when present, the write only lands
//! if the row has not changed since the operator read it, otherwise the
//! request fails with 409 instead of silently overwriting.

use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use closer_core::error::CoreError;
use closer_core::pipeline::{
    validate_closer_status, validate_orario, validate_status, PipelineStep,
};
use closer_core::types::{RecordId, Timestamp};
use closer_db::models::{Property, UpdateStep};
use closer_db::repositories::PropertyRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Body for `PATCH /properties/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusBody {
    pub status: String,
    pub expected_updated_at: Option<Timestamp>,
}

/// Body for `PATCH /properties/{id}/closer-status`.
#[derive(Debug, Deserialize)]
pub struct UpdateCloserStatusBody {
    pub closer_status: String,
    pub expected_updated_at: Option<Timestamp>,
}

/// Body for `PUT /properties/{id}/notes`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateNotesBody {
    #[validate(length(max = 10000, message = "notes must be at most 10000 characters"))]
    pub closer_notes: String,
    pub expected_updated_at: Option<Timestamp>,
}

/// Body for `PATCH /properties/{id}/steps/{step}`.
#[derive(Debug, Deserialize)]
pub struct UpdateStepBody {
    pub stato: Option<String>,
    pub data: Option<NaiveDate>,
    pub orario: Option<String>,
    pub expected_updated_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// PATCH /api/v1/properties/{id}/status
///
/// Set the coarse valuation status. Approving stamps `approved_at`.
pub async fn update_status(
    _operator: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(body): Json<UpdateStatusBody>,
) -> AppResult<Json<DataResponse<Property>>> {
    validate_status(&body.status)?;

    let updated = PropertyRepo::update_status(
        &state.properties_pool,
        id,
        &body.status,
        body.expected_updated_at,
    )
    .await?;

    let property = applied_or_rejected(&state, id, updated, body.expected_updated_at).await?;
    Ok(Json(DataResponse { data: property }))
}

/// PATCH /api/v1/properties/{id}/closer-status
pub async fn update_closer_status(
    _operator: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(body): Json<UpdateCloserStatusBody>,
) -> AppResult<Json<DataResponse<Property>>> {
    validate_closer_status(&body.closer_status)?;

    let updated = PropertyRepo::update_closer_status(
        &state.properties_pool,
        id,
        &body.closer_status,
        body.expected_updated_at,
    )
    .await?;

    let property = applied_or_rejected(&state, id, updated, body.expected_updated_at).await?;
    Ok(Json(DataResponse { data: property }))
}

/// PUT /api/v1/properties/{id}/notes
pub async fn update_notes(
    _operator: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(body): Json<UpdateNotesBody>,
) -> AppResult<Json<DataResponse<Property>>> {
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let updated = PropertyRepo::update_notes(
        &state.properties_pool,
        id,
        &body.closer_notes,
        body.expected_updated_at,
    )
    .await?;

    let property = applied_or_rejected(&state, id, updated, body.expected_updated_at).await?;
    Ok(Json(DataResponse { data: property }))
}

/// PATCH /api/v1/properties/{id}/steps/{step}
///
/// Apply an operator edit to one pipeline step. Provided fields land in a
/// single atomic update.
pub async fn update_step(
    _operator: AuthUser,
    State(state): State<AppState>,
    Path((id, step)): Path<(RecordId, String)>,
    Json(body): Json<UpdateStepBody>,
) -> AppResult<Json<DataResponse<Property>>> {
    let step: PipelineStep = step.parse()?;

    if body.stato.is_none() && body.data.is_none() && body.orario.is_none() {
        return Err(AppError::BadRequest(
            "At least one of stato, data, orario must be provided".to_string(),
        ));
    }
    if let Some(stato) = &body.stato {
        step.validate_state(stato)?;
    }
    if let Some(orario) = &body.orario {
        validate_orario(orario)?;
    }

    let input = UpdateStep {
        stato: body.stato,
        data: body.data,
        orario: body.orario,
    };
    let updated = PropertyRepo::update_step(
        &state.properties_pool,
        id,
        step,
        &input,
        body.expected_updated_at,
    )
    .await?;

    let property = applied_or_rejected(&state, id, updated, body.expected_updated_at).await?;
    Ok(Json(DataResponse { data: property }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Disambiguate a zero-row update: the row either does not exist (404) or
/// was changed under a stale concurrency token (409).
async fn applied_or_rejected(
    state: &AppState,
    id: RecordId,
    updated: Option<Property>,
    expected_updated_at: Option<Timestamp>,
) -> AppResult<Property> {
    if let Some(property) = updated {
        return Ok(property);
    }

    if expected_updated_at.is_some()
        && PropertyRepo::find_by_id(&state.properties_pool, id)
            .await?
            .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "Property was modified by another operator; reload and retry".to_string(),
        )));
    }

    Err(AppError::Core(CoreError::NotFound {
        entity: "Property",
        id,
    }))
}
