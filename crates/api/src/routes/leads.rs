//! Route definitions for the `/leads` resource.
//!
//! Also mounts the booking endpoints, which are lead-scoped.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{calendar, leads};
use crate::state::AppState;

/// Routes mounted at `/leads`.
///
/// ```text
/// GET    /                            -> list_leads
/// GET    /search                      -> search_leads
/// GET    /{id}                        -> get_lead
/// DELETE /{id}                        -> delete_lead
///
/// POST   /{id}/appointments           -> book_appointment
/// POST   /{id}/appointments/external  -> record_external_booking
/// GET    /{id}/scheduler-link         -> scheduler_link
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(leads::list_leads))
        .route("/search", get(leads::search_leads))
        .route("/{id}", get(leads::get_lead).delete(leads::delete_lead))
        .route("/{id}/appointments", post(calendar::book_appointment))
        .route(
            "/{id}/appointments/external",
            post(calendar::record_external_booking),
        )
        .route("/{id}/scheduler-link", get(calendar::scheduler_link))
}
