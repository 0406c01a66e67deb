//! Authentication primitives.
//!
//! Operators authenticate against an external identity provider; this
//! module only validates the resulting HS256 access tokens.

pub mod jwt;
