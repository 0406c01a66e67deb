//! Route definitions for the `/calendar` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::calendar;
use crate::state::AppState;

/// Routes mounted at `/calendar`.
///
/// ```text
/// POST   /session  -> connect_session
/// DELETE /session  -> disconnect_session
/// GET    /slots    -> day_slots
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/session",
            post(calendar::connect_session).delete(calendar::disconnect_session),
        )
        .route("/slots", get(calendar::day_slots))
}
