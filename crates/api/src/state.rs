use std::sync::Arc;

use closer_calendar::{CalendarApi, SharedSession};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Connection pool for store A (qualification calls).
    pub calls_pool: closer_db::DbPool,
    /// Connection pool for store B (property/pipeline records).
    pub properties_pool: closer_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Calendar provider client.
    pub calendar: Arc<CalendarApi>,
    /// In-memory calendar credential; `None` until the operator connects.
    pub calendar_session: SharedSession,
}
