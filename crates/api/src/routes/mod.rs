pub mod calendar;
pub mod health;
pub mod leads;
pub mod properties;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /leads                              unified lead list
/// /leads/search                       filtered lead list
/// /leads/{id}                         lead detail, lead deletion
/// /leads/{id}/appointments            book via the calendar provider
/// /leads/{id}/appointments/external   record a hosted-widget booking
/// /leads/{id}/scheduler-link          prefilled link for the hosted widget
///
/// /properties/{id}/status             coarse valuation status
/// /properties/{id}/closer-status      operator pipeline status
/// /properties/{id}/notes              operator notes
/// /properties/{id}/steps/{step}       pipeline step edits
///
/// /calendar/session                   connect / disconnect the calendar
/// /calendar/slots                     day availability
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/leads", leads::router())
        .nest("/properties", properties::router())
        .nest("/calendar", calendar::router())
}
