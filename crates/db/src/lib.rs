//! Data access for the two external stores.
//!
//! Store A holds the qualification calls, store B the property/pipeline
//! records. Both are Postgres; each gets its own connection pool. The
//! schemas are owned by the external projects — the migrations bundled here
//! exist only so the integration-test harness can build a matching database.

pub mod models;
pub mod repositories;

/// Connection pool to one of the external stores.
pub type DbPool = sqlx::PgPool;

/// Maximum connections per store pool.
const MAX_CONNECTIONS: u32 = 5;

/// Create a connection pool for a store URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await
}

/// Verify the store is reachable with a trivial round-trip.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}
