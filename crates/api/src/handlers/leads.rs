//! Handlers for the unified `/leads` resource.
//!
//! A lead is not stored anywhere: every response here is the reconciliation
//! of store A (calls) and store B (properties) at query time.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use closer_core::error::CoreError;
use closer_core::lead::{normalize_phone, pick_primary_call, LeadMerge, LeadSummary};
use closer_core::search::{classify_query, SearchQuery};
use closer_core::types::RecordId;
use closer_db::models::{Call, Property};
use closer_db::repositories::{CallRepo, PropertyRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /leads/search`.
#[derive(Debug, Deserialize)]
pub struct LeadSearchQuery {
    /// Free-text query: a name, an address fragment, or a phone number.
    pub q: Option<String>,
}

/// Response payload for `GET /leads/{id}`: the property and/or call that
/// make up the lead. At least one side is always present.
#[derive(Debug, Serialize)]
pub struct LeadProfile {
    pub property: Option<Property>,
    pub call: Option<Call>,
}

/// Run the reconciliation over already-fetched record sets.
fn merge_records(properties: &[Property], calls: &[Call]) -> Vec<LeadSummary> {
    let mut merge = LeadMerge::new();
    for property in properties {
        merge.add_property(property.merge_seed());
    }
    for call in calls {
        merge.add_call(call.merge_seed());
    }
    merge.into_sorted()
}

// ---------------------------------------------------------------------------
// Listing and search
// ---------------------------------------------------------------------------

/// GET /api/v1/leads
///
/// The full unified lead list, most recent interaction first.
pub async fn list_leads(
    _operator: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<LeadSummary>>>> {
    let properties = PropertyRepo::list_all(&state.properties_pool).await?;
    let calls = CallRepo::list_all(&state.calls_pool).await?;

    Ok(Json(DataResponse {
        data: merge_records(&properties, &calls),
    }))
}

/// GET /api/v1/leads/search?q=...
///
/// Filtered lead list. Phone-like queries match phone substrings on both
/// stores; text queries match property name/surname/address and call name.
/// Queries shorter than two characters return empty without touching the
/// stores.
pub async fn search_leads(
    _operator: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<LeadSearchQuery>,
) -> AppResult<Json<DataResponse<Vec<LeadSummary>>>> {
    let raw = params.q.unwrap_or_default();

    let (properties, calls) = match classify_query(&raw) {
        SearchQuery::TooShort => {
            return Ok(Json(DataResponse { data: Vec::new() }));
        }
        SearchQuery::Phone(query) => {
            let properties = PropertyRepo::search_by_phone(&state.properties_pool, &query).await?;
            let calls = CallRepo::search_by_phone(&state.calls_pool, &query).await?;
            (properties, calls)
        }
        SearchQuery::Text(query) => {
            let properties = PropertyRepo::search_by_text(&state.properties_pool, &query).await?;
            let calls = CallRepo::search_by_name(&state.calls_pool, &query).await?;
            (properties, calls)
        }
    };

    Ok(Json(DataResponse {
        data: merge_records(&properties, &calls),
    }))
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

/// GET /api/v1/leads/{id}
///
/// Resolve an opaque id as a property first, then as a call, and complete
/// the profile with the other record type: exact lead-id match preferred,
/// phone substring as fallback. Among candidate calls, a qualified one wins
/// over recency.
pub async fn get_lead(
    _operator: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> AppResult<Json<DataResponse<LeadProfile>>> {
    let mut property = PropertyRepo::find_by_id(&state.properties_pool, id).await?;
    let mut call = None;

    if property.is_none() {
        call = CallRepo::find_by_id(&state.calls_pool, id).await?;
    }

    let (lead_id, phone) = match (&property, &call) {
        (Some(p), _) => (p.lead_id, p.lead_telefono.clone()),
        (None, Some(c)) => (c.lead_id, c.lead_telefono.clone()),
        (None, None) => {
            return Err(AppError::Core(CoreError::NotFound { entity: "Lead", id }));
        }
    };

    if let Some(lead_id) = lead_id {
        if property.is_none() {
            property = PropertyRepo::find_latest_by_lead_id(&state.properties_pool, lead_id).await?;
        }
        if call.is_none() {
            let candidates = CallRepo::list_by_lead_id(&state.calls_pool, lead_id).await?;
            call = pick_primary_call(&candidates, |c| &c.esito_qualificazione).cloned();
        }
    } else if !normalize_phone(&phone).is_empty() {
        if property.is_none() {
            property = PropertyRepo::find_latest_by_phone(&state.properties_pool, &phone).await?;
        }
        if call.is_none() {
            let candidates = CallRepo::list_by_phone(&state.calls_pool, &phone).await?;
            call = pick_primary_call(&candidates, |c| &c.esito_qualificazione).cloned();
        }
    }

    Ok(Json(DataResponse {
        data: LeadProfile { property, call },
    }))
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

/// DELETE /api/v1/leads/{id}
///
/// Remove a lead's records from both stores. A property id removes the
/// property plus its calls (matched by lead id, or phone substring when the
/// property carries no lead id); a call id removes that call only.
pub async fn delete_lead(
    operator: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> AppResult<impl IntoResponse> {
    if let Some(property) = PropertyRepo::find_by_id(&state.properties_pool, id).await? {
        PropertyRepo::delete_by_id(&state.properties_pool, id).await?;

        let calls_removed = match property.lead_id {
            Some(lead_id) => CallRepo::delete_by_lead_id(&state.calls_pool, lead_id).await?,
            None if !property.lead_telefono.is_empty() => {
                CallRepo::delete_by_phone(&state.calls_pool, &property.lead_telefono).await?
            }
            None => 0,
        };

        tracing::info!(
            operator = %operator.subject,
            property_id = %id,
            calls_removed,
            "Lead deleted"
        );
        return Ok(StatusCode::NO_CONTENT);
    }

    if CallRepo::delete_by_id(&state.calls_pool, id).await? {
        tracing::info!(operator = %operator.subject, call_id = %id, "Call deleted");
        return Ok(StatusCode::NO_CONTENT);
    }

    Err(AppError::Core(CoreError::NotFound { entity: "Lead", id }))
}
