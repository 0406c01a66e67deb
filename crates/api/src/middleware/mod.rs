//! Authentication middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated operator from a JWT
//!   Bearer token.

pub mod auth;
