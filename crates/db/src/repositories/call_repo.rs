//! Repository for the `calls` table (store A).

use closer_core::types::RecordId;
use sqlx::PgPool;

use crate::models::call::Call;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, lead_id, lead_nome, lead_telefono, transcript, esito_qualificazione, \
     durata_chiamata, riepilogo_chiamata, chiamata_completata, urgenza_cliente, \
     sentiment_cliente, callback_orario, callback_motivo, obiezioni_cliente, \
     note_aggiuntive, created_at";

/// Read and delete operations for qualification calls. The external
/// pipeline is the only writer.
pub struct CallRepo;

impl CallRepo {
    /// List every call, most recent first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Call>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM calls ORDER BY created_at DESC");
        sqlx::query_as::<_, Call>(&query).fetch_all(pool).await
    }

    /// Case-insensitive substring search on the caller name, most recent first.
    pub async fn search_by_name(pool: &PgPool, name: &str) -> Result<Vec<Call>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM calls
             WHERE lead_nome ILIKE '%' || $1 || '%'
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Call>(&query)
            .bind(name)
            .fetch_all(pool)
            .await
    }

    /// Case-insensitive substring search on the phone number, most recent first.
    pub async fn search_by_phone(pool: &PgPool, phone: &str) -> Result<Vec<Call>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM calls
             WHERE lead_telefono ILIKE '%' || $1 || '%'
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Call>(&query)
            .bind(phone)
            .fetch_all(pool)
            .await
    }

    /// Find a call by its id.
    pub async fn find_by_id(pool: &PgPool, id: RecordId) -> Result<Option<Call>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM calls WHERE id = $1");
        sqlx::query_as::<_, Call>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All calls sharing a lead id, most recent first.
    pub async fn list_by_lead_id(
        pool: &PgPool,
        lead_id: RecordId,
    ) -> Result<Vec<Call>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM calls WHERE lead_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Call>(&query)
            .bind(lead_id)
            .fetch_all(pool)
            .await
    }

    /// All calls whose phone contains the given substring, most recent first.
    pub async fn list_by_phone(pool: &PgPool, phone: &str) -> Result<Vec<Call>, sqlx::Error> {
        Self::search_by_phone(pool, phone).await
    }

    /// Delete a call by id. Returns `true` if a row was removed.
    pub async fn delete_by_id(pool: &PgPool, id: RecordId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM calls WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every call sharing a lead id. Returns the number of rows removed.
    pub async fn delete_by_lead_id(pool: &PgPool, lead_id: RecordId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM calls WHERE lead_id = $1")
            .bind(lead_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete every call whose phone contains the given substring.
    /// Returns the number of rows removed.
    pub async fn delete_by_phone(pool: &PgPool, phone: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM calls WHERE lead_telefono ILIKE '%' || $1 || '%'")
            .bind(phone)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
