//! Route definitions for the `/properties` resource.
//!
//! Every endpoint here is a field-scoped operator edit against store B.

use axum::routing::{patch, put};
use axum::Router;

use crate::handlers::pipeline;
use crate::state::AppState;

/// Routes mounted at `/properties`.
///
/// ```text
/// PATCH  /{id}/status         -> update_status
/// PATCH  /{id}/closer-status  -> update_closer_status
/// PUT    /{id}/notes          -> update_notes
/// PATCH  /{id}/steps/{step}   -> update_step
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/status", patch(pipeline::update_status))
        .route("/{id}/closer-status", patch(pipeline::update_closer_status))
        .route("/{id}/notes", put(pipeline::update_notes))
        .route("/{id}/steps/{step}", patch(pipeline::update_step))
}
