//! In-memory calendar credential.
//!
//! The bearer token comes from an out-of-band browser authorization
//! handshake and lives only for the process lifetime. It is wrapped in an
//! explicit session with an expiry instant rather than a free-floating
//! global, and shared behind a lock so handlers can read it concurrently.

use std::sync::Arc;

use closer_core::types::Timestamp;
use tokio::sync::RwLock;

/// A bearer credential for the calendar provider, valid until `expires_at`.
#[derive(Debug, Clone)]
pub struct CalendarSession {
    access_token: String,
    expires_at: Timestamp,
}

/// The session slot shared across handlers. `None` until the operator
/// connects their calendar.
pub type SharedSession = Arc<RwLock<Option<CalendarSession>>>;

impl CalendarSession {
    pub fn new(access_token: String, expires_at: Timestamp) -> Self {
        Self {
            access_token,
            expires_at,
        }
    }

    /// Whether the credential is past its expiry at `now`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }

    pub fn token(&self) -> &str {
        &self.access_token
    }

    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }
}
