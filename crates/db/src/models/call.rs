//! Qualification-call entity (store A).

use closer_core::lead::CallSeed;
use closer_core::qualification::{parse_transcript, TranscriptTurn};
use closer_core::types::{RecordId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `calls` table. Written by the external qualification
/// pipeline; immutable from this system's perspective except for deletion.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Call {
    pub id: RecordId,
    pub lead_id: Option<RecordId>,
    pub lead_nome: String,
    pub lead_telefono: String,
    /// Ordered `{role, content}` turns. Older pipeline versions double-encode
    /// this as a JSON string; use [`Call::transcript_turns`] to read it.
    pub transcript: serde_json::Value,
    pub esito_qualificazione: String,
    /// Call duration in seconds.
    pub durata_chiamata: i32,
    pub riepilogo_chiamata: Option<String>,
    pub chiamata_completata: Option<bool>,
    pub urgenza_cliente: Option<String>,
    pub sentiment_cliente: Option<String>,
    pub callback_orario: Option<String>,
    pub callback_motivo: Option<String>,
    pub obiezioni_cliente: Option<String>,
    pub note_aggiuntive: Option<String>,
    pub created_at: Timestamp,
}

impl Call {
    /// Parse the raw transcript payload into ordered turns.
    pub fn transcript_turns(&self) -> Vec<TranscriptTurn> {
        parse_transcript(&self.transcript)
    }

    /// Project this row into the fields the lead merge consumes.
    pub fn merge_seed(&self) -> CallSeed {
        CallSeed {
            id: self.id,
            lead_id: self.lead_id,
            nome: self.lead_nome.clone(),
            telefono: self.lead_telefono.clone(),
            esito_qualificazione: self.esito_qualificazione.clone(),
            created_at: self.created_at,
        }
    }
}
