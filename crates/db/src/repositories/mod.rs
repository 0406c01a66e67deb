//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument. `CallRepo` targets store A,
//! `PropertyRepo` store B; the caller passes the matching pool.

pub mod call_repo;
pub mod property_repo;

pub use call_repo::CallRepo;
pub use property_repo::PropertyRepo;
