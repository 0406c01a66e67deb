//! Handlers for the calendar session, availability, and appointment booking.
//!
//! Booking order matters: the provider event is created first, and the
//! pipeline step is only written after the provider confirms. A provider
//! failure therefore leaves pipeline state untouched. There is no
//! idempotency key — retrying after a partial provider success can create a
//! duplicate event.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use closer_calendar::booking::{event_description, event_summary, scheduler_prefill_url};
use closer_calendar::{CalendarEvent, CalendarSession};
use closer_core::error::CoreError;
use closer_core::pipeline::PipelineStep;
use closer_core::slots::{generate_time_slots, SlotConfig, TimeSlot};
use closer_core::types::{RecordId, Timestamp};
use closer_db::models::Property;
use closer_db::repositories::PropertyRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Default credential lifetime when the authorization response carries none.
const DEFAULT_SESSION_SECS: i64 = 3600;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body for `POST /calendar/session`.
#[derive(Debug, Deserialize, Validate)]
pub struct ConnectSessionBody {
    /// Bearer token obtained by the browser-side authorization handshake.
    #[validate(length(min = 1, message = "access_token must not be empty"))]
    pub access_token: String,
    /// Token lifetime as reported by the provider.
    pub expires_in_secs: Option<i64>,
}

/// Query parameters for `GET /calendar/slots`.
#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    /// Day to compute availability for (`YYYY-MM-DD`).
    pub date: NaiveDate,
}

/// Body for `POST /leads/{id}/appointments`.
#[derive(Debug, Deserialize)]
pub struct BookAppointmentBody {
    pub step: PipelineStep,
    pub start: Timestamp,
    pub end: Timestamp,
}

/// Body for `POST /leads/{id}/appointments/external` — a booking made
/// through the hosted scheduling widget.
#[derive(Debug, Deserialize)]
pub struct ExternalBookingBody {
    pub step: PipelineStep,
    pub start_time: Timestamp,
}

/// Query parameters for `GET /leads/{id}/scheduler-link`.
#[derive(Debug, Deserialize)]
pub struct SchedulerLinkQuery {
    pub step: PipelineStep,
}

/// Response payload for a confirmed booking.
#[derive(Debug, Serialize)]
pub struct BookingResult {
    pub event: CalendarEvent,
    pub property: Property,
}

/// Response payload for `GET /leads/{id}/scheduler-link`.
#[derive(Debug, Serialize)]
pub struct SchedulerLink {
    pub url: String,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// POST /api/v1/calendar/session
///
/// Store the calendar bearer credential in memory for this process.
pub async fn connect_session(
    operator: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<ConnectSessionBody>,
) -> AppResult<impl IntoResponse> {
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let expires_at =
        Utc::now() + Duration::seconds(body.expires_in_secs.unwrap_or(DEFAULT_SESSION_SECS));
    *state.calendar_session.write().await =
        Some(CalendarSession::new(body.access_token, expires_at));

    tracing::info!(operator = %operator.subject, %expires_at, "Calendar connected");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/calendar/session
pub async fn disconnect_session(
    operator: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    *state.calendar_session.write().await = None;
    tracing::info!(operator = %operator.subject, "Calendar disconnected");
    Ok(StatusCode::NO_CONTENT)
}

/// Fetch the live credential, failing 401 when the calendar has never been
/// connected or the token has expired.
async fn require_session(state: &AppState) -> AppResult<String> {
    let guard = state.calendar_session.read().await;
    match guard.as_ref() {
        Some(session) if !session.is_expired(Utc::now()) => Ok(session.token().to_string()),
        _ => Err(AppError::Core(CoreError::Unauthorized(
            "Calendar not connected; authorize the calendar first".to_string(),
        ))),
    }
}

// ---------------------------------------------------------------------------
// Availability
// ---------------------------------------------------------------------------

/// GET /api/v1/calendar/slots?date=YYYY-MM-DD
///
/// The day's bookable slots, recomputed from the provider's event list on
/// every call.
pub async fn day_slots(
    _operator: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SlotsQuery>,
) -> AppResult<Json<DataResponse<Vec<TimeSlot>>>> {
    let token = require_session(&state).await?;
    let config = &state.config.calendar;

    let day_start = params.date.and_hms_opt(0, 0, 0).expect("midnight").and_utc();
    let day_end = params
        .date
        .and_hms_opt(23, 59, 59)
        .expect("end of day")
        .and_utc();

    let events = state
        .calendar
        .list_events(&token, &config.calendar_id, day_start, day_end)
        .await?;

    let busy: Vec<_> = events.iter().map(CalendarEvent::busy_interval).collect();
    let slots = generate_time_slots(params.date, &busy, &SlotConfig::default());

    Ok(Json(DataResponse { data: slots }))
}

// ---------------------------------------------------------------------------
// Booking
// ---------------------------------------------------------------------------

/// POST /api/v1/leads/{id}/appointments
///
/// Create the provider event for a bookable step, then mark the step as
/// organized with the event's date and time.
pub async fn book_appointment(
    operator: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(body): Json<BookAppointmentBody>,
) -> AppResult<Json<DataResponse<BookingResult>>> {
    require_bookable(body.step)?;

    let property = PropertyRepo::find_by_id(&state.properties_pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Property",
            id,
        }))?;

    let token = require_session(&state).await?;
    let config = &state.config.calendar;

    let name = property.display_name();
    let summary = event_summary(&name);
    let description = event_description(
        &name,
        &property.lead_telefono,
        Some(&property.indirizzo_completo),
        Some(property.id),
    );

    // Provider first; the step is only written once the event exists.
    let event = state
        .calendar
        .create_event(
            &token,
            &config.calendar_id,
            &summary,
            &description,
            body.start,
            body.end,
            &config.timezone,
        )
        .await?;

    let data = event.start.date_naive();
    let orario = event.start.format("%H:%M").to_string();
    let property = PropertyRepo::record_step_schedule(&state.properties_pool, id, body.step, data, &orario)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Property",
            id,
        }))?;

    tracing::info!(
        operator = %operator.subject,
        property_id = %id,
        step = %body.step,
        event_id = %event.id,
        "Appointment booked"
    );

    Ok(Json(DataResponse {
        data: BookingResult { event, property },
    }))
}

/// POST /api/v1/leads/{id}/appointments/external
///
/// Record a booking made through the hosted scheduling widget: the widget
/// signals the scheduled start time; the step is marked organized with it.
pub async fn record_external_booking(
    operator: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(body): Json<ExternalBookingBody>,
) -> AppResult<Json<DataResponse<Property>>> {
    require_bookable(body.step)?;

    let data = body.start_time.date_naive();
    let orario = body.start_time.format("%H:%M").to_string();

    let property = PropertyRepo::record_step_schedule(&state.properties_pool, id, body.step, data, &orario)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Property",
            id,
        }))?;

    tracing::info!(
        operator = %operator.subject,
        property_id = %id,
        step = %body.step,
        "External booking recorded"
    );

    Ok(Json(DataResponse { data: property }))
}

/// GET /api/v1/leads/{id}/scheduler-link?step=...
///
/// The hosted scheduling page for a bookable step, prefilled with the
/// lead's name, address, and phone.
pub async fn scheduler_link(
    _operator: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Query(params): Query<SchedulerLinkQuery>,
) -> AppResult<Json<DataResponse<SchedulerLink>>> {
    require_bookable(params.step)?;

    let property = PropertyRepo::find_by_id(&state.properties_pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Property",
            id,
        }))?;

    let base_url = state
        .config
        .calendar
        .scheduler_url(params.step)
        .expect("bookable steps always have a scheduler URL");

    let url = scheduler_prefill_url(
        base_url,
        &property.display_name(),
        &property.lead_telefono,
        Some(&property.indirizzo_completo),
    )
    .map_err(|e| AppError::InternalError(format!("Invalid scheduler URL: {e}")))?;

    Ok(Json(DataResponse {
        data: SchedulerLink {
            url: url.to_string(),
        },
    }))
}

/// Only the site visit and the preliminary contract are calendar-backed.
fn require_bookable(step: PipelineStep) -> AppResult<()> {
    if step.is_bookable() {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Validation(format!(
            "Step '{step}' is not calendar-backed; only sopralluogo and preliminare can be booked"
        ))))
    }
}
