//! Repository for the `properties` table (store B).
//!
//! Operator edits are field-scoped updates. Every update bumps
//! `updated_at`, which doubles as the optimistic-concurrency token: when the
//! caller supplies `expected_updated_at`, the update only applies if the row
//! has not moved since the operator last read it.

use chrono::NaiveDate;
use closer_core::pipeline::PipelineStep;
use closer_core::types::{RecordId, Timestamp};
use sqlx::PgPool;

use crate::models::property::{Property, UpdateStep};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, lead_id, created_at, updated_at, lead_nome, lead_cognome, lead_email, \
     lead_telefono, indirizzo_completo, numero_civico, tipo_immobile, condizioni_immobile, \
     superficie_mq, numero_locali, numero_bagni, piano_immobile, ascensore, anno_costruzione, \
     aree_esterne, pertinenze, prezzo_riferimento, prezzo_rivendita, prezzo_acquisto, roi, \
     utile_lordo, totale_costi, totale_costi_escluso_acquisto, offerta_definitiva, status, \
     approved_at, closer_status, closer_notes, \
     step_chiamata, step_chiamata_data, step_chiamata_orario, \
     step_sopralluogo, step_sopralluogo_data, step_sopralluogo_orario, \
     step_accordo, step_accordo_data, step_accordo_orario, \
     step_preliminare, step_preliminare_data, step_preliminare_orario";

/// Read, update, and delete operations for property/pipeline records.
pub struct PropertyRepo;

impl PropertyRepo {
    /// List every property, most recent first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Property>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM properties ORDER BY created_at DESC");
        sqlx::query_as::<_, Property>(&query).fetch_all(pool).await
    }

    /// Case-insensitive substring search on the phone number, most recent first.
    pub async fn search_by_phone(pool: &PgPool, phone: &str) -> Result<Vec<Property>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM properties
             WHERE lead_telefono ILIKE '%' || $1 || '%'
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(phone)
            .fetch_all(pool)
            .await
    }

    /// Case-insensitive substring search on first name, last name, or
    /// address, most recent first.
    pub async fn search_by_text(pool: &PgPool, text: &str) -> Result<Vec<Property>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM properties
             WHERE lead_nome ILIKE '%' || $1 || '%'
                OR lead_cognome ILIKE '%' || $1 || '%'
                OR indirizzo_completo ILIKE '%' || $1 || '%'
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(text)
            .fetch_all(pool)
            .await
    }

    /// Find a property by its id.
    pub async fn find_by_id(pool: &PgPool, id: RecordId) -> Result<Option<Property>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM properties WHERE id = $1");
        sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The most recent property sharing a lead id.
    pub async fn find_latest_by_lead_id(
        pool: &PgPool,
        lead_id: RecordId,
    ) -> Result<Option<Property>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM properties
             WHERE lead_id = $1
             ORDER BY created_at DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(lead_id)
            .fetch_optional(pool)
            .await
    }

    /// The most recent property whose phone contains the given substring.
    pub async fn find_latest_by_phone(
        pool: &PgPool,
        phone: &str,
    ) -> Result<Option<Property>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM properties
             WHERE lead_telefono ILIKE '%' || $1 || '%'
             ORDER BY created_at DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(phone)
            .fetch_optional(pool)
            .await
    }

    /// Set the coarse valuation status. Approving stamps `approved_at`,
    /// reverting to pending clears it.
    ///
    /// Returns `None` when no row matched (missing id, or a stale
    /// `expected_updated_at` token).
    pub async fn update_status(
        pool: &PgPool,
        id: RecordId,
        status: &str,
        expected_updated_at: Option<Timestamp>,
    ) -> Result<Option<Property>, sqlx::Error> {
        let guard = guard_clause(expected_updated_at, 3);
        let query = format!(
            "UPDATE properties SET
                status = $2,
                approved_at = CASE WHEN $2 = 'approved' THEN NOW() ELSE NULL END,
                updated_at = NOW()
             WHERE id = $1{guard}
             RETURNING {COLUMNS}"
        );
        let mut update = sqlx::query_as::<_, Property>(&query).bind(id).bind(status);
        if let Some(expected) = expected_updated_at {
            update = update.bind(expected);
        }
        update.fetch_optional(pool).await
    }

    /// Set the operator-controlled closer status.
    pub async fn update_closer_status(
        pool: &PgPool,
        id: RecordId,
        closer_status: &str,
        expected_updated_at: Option<Timestamp>,
    ) -> Result<Option<Property>, sqlx::Error> {
        let guard = guard_clause(expected_updated_at, 3);
        let query = format!(
            "UPDATE properties SET closer_status = $2, updated_at = NOW()
             WHERE id = $1{guard}
             RETURNING {COLUMNS}"
        );
        let mut update = sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .bind(closer_status);
        if let Some(expected) = expected_updated_at {
            update = update.bind(expected);
        }
        update.fetch_optional(pool).await
    }

    /// Replace the operator notes.
    pub async fn update_notes(
        pool: &PgPool,
        id: RecordId,
        notes: &str,
        expected_updated_at: Option<Timestamp>,
    ) -> Result<Option<Property>, sqlx::Error> {
        let guard = guard_clause(expected_updated_at, 3);
        let query = format!(
            "UPDATE properties SET closer_notes = $2, updated_at = NOW()
             WHERE id = $1{guard}
             RETURNING {COLUMNS}"
        );
        let mut update = sqlx::query_as::<_, Property>(&query).bind(id).bind(notes);
        if let Some(expected) = expected_updated_at {
            update = update.bind(expected);
        }
        update.fetch_optional(pool).await
    }

    /// Apply an operator edit to one pipeline step. Only the provided
    /// fields change, in a single atomic update.
    pub async fn update_step(
        pool: &PgPool,
        id: RecordId,
        step: PipelineStep,
        input: &UpdateStep,
        expected_updated_at: Option<Timestamp>,
    ) -> Result<Option<Property>, sqlx::Error> {
        let state_col = step.state_column();
        let date_col = step.date_column();
        let time_col = step.time_column();
        let guard = guard_clause(expected_updated_at, 5);
        let query = format!(
            "UPDATE properties SET
                {state_col} = COALESCE($2, {state_col}),
                {date_col} = COALESCE($3, {date_col}),
                {time_col} = COALESCE($4, {time_col}),
                updated_at = NOW()
             WHERE id = $1{guard}
             RETURNING {COLUMNS}"
        );
        let mut update = sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .bind(&input.stato)
            .bind(input.data)
            .bind(&input.orario);
        if let Some(expected) = expected_updated_at {
            update = update.bind(expected);
        }
        update.fetch_optional(pool).await
    }

    /// Record a confirmed booking on a step: done state, date, and HH:MM
    /// time in one atomic update.
    pub async fn record_step_schedule(
        pool: &PgPool,
        id: RecordId,
        step: PipelineStep,
        data: NaiveDate,
        orario: &str,
    ) -> Result<Option<Property>, sqlx::Error> {
        let state_col = step.state_column();
        let date_col = step.date_column();
        let time_col = step.time_column();
        let query = format!(
            "UPDATE properties SET
                {state_col} = $2,
                {date_col} = $3,
                {time_col} = $4,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .bind(step.done_state())
            .bind(data)
            .bind(orario)
            .fetch_optional(pool)
            .await
    }

    /// Delete a property by id. Returns `true` if a row was removed.
    pub async fn delete_by_id(pool: &PgPool, id: RecordId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Optional optimistic-concurrency guard, appended to the WHERE clause.
fn guard_clause(expected: Option<Timestamp>, bind_idx: usize) -> String {
    match expected {
        Some(_) => format!(" AND updated_at = ${bind_idx}"),
        None => String::new(),
    }
}
