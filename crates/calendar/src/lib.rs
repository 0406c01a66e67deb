//! Calendar-provider integration.
//!
//! Wraps the provider's REST API (event listing, event creation) behind
//! [`api::CalendarApi`], holds the in-memory bearer session, and builds the
//! templated appointment events plus the hosted scheduling-widget prefill
//! links.

pub mod api;
pub mod booking;
pub mod session;

pub use api::{CalendarApi, CalendarApiError, CalendarEvent};
pub use session::{CalendarSession, SharedSession};
