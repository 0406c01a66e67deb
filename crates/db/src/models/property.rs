//! Property/pipeline entity (store B) and its update DTOs.

use chrono::NaiveDate;
use closer_core::lead::PropertySeed;
use closer_core::types::{RecordId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `properties` table: valuation data produced by the
/// external pipeline plus the operator-controlled pipeline state.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Property {
    pub id: RecordId,
    pub lead_id: Option<RecordId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,

    pub lead_nome: String,
    pub lead_cognome: Option<String>,
    pub lead_email: Option<String>,
    pub lead_telefono: String,

    pub indirizzo_completo: String,
    pub numero_civico: Option<String>,
    pub tipo_immobile: Option<String>,
    pub condizioni_immobile: Option<String>,
    pub superficie_mq: Option<i32>,
    pub numero_locali: Option<i32>,
    pub numero_bagni: Option<i32>,
    pub piano_immobile: Option<String>,
    pub ascensore: Option<String>,
    pub anno_costruzione: Option<i32>,
    pub aree_esterne: Option<String>,
    pub pertinenze: Option<String>,

    /// Valuation figures in whole euros.
    pub prezzo_riferimento: Option<i64>,
    pub prezzo_rivendita: Option<i64>,
    pub prezzo_acquisto: Option<i64>,
    pub roi: Option<f64>,
    pub utile_lordo: Option<i64>,
    pub totale_costi: Option<i64>,
    pub totale_costi_escluso_acquisto: Option<i64>,
    pub offerta_definitiva: Option<i64>,

    /// Coarse valuation status: `approved` | `pending`. Independent of
    /// `closer_status`; the two are never reconciled.
    pub status: String,
    pub approved_at: Option<Timestamp>,
    pub closer_status: String,
    pub closer_notes: Option<String>,

    pub step_chiamata: String,
    pub step_chiamata_data: Option<NaiveDate>,
    pub step_chiamata_orario: Option<String>,
    pub step_sopralluogo: String,
    pub step_sopralluogo_data: Option<NaiveDate>,
    pub step_sopralluogo_orario: Option<String>,
    pub step_accordo: String,
    pub step_accordo_data: Option<NaiveDate>,
    pub step_accordo_orario: Option<String>,
    pub step_preliminare: String,
    pub step_preliminare_data: Option<NaiveDate>,
    pub step_preliminare_orario: Option<String>,
}

impl Property {
    /// Full display name: first plus last name, trimmed.
    pub fn display_name(&self) -> String {
        let cognome = self.lead_cognome.as_deref().unwrap_or("");
        format!("{} {}", self.lead_nome, cognome).trim().to_string()
    }

    /// Project this row into the fields the lead merge consumes.
    pub fn merge_seed(&self) -> PropertySeed {
        PropertySeed {
            id: self.id,
            lead_id: self.lead_id,
            nome: self.lead_nome.clone(),
            cognome: self.lead_cognome.clone(),
            telefono: self.lead_telefono.clone(),
            indirizzo: self.indirizzo_completo.clone(),
            status: self.status.clone(),
            created_at: self.created_at,
            updated_at: Some(self.updated_at),
        }
    }
}

/// DTO for `PATCH /properties/{id}/steps/{step}`.
///
/// Only provided fields are applied, in a single atomic update.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateStep {
    pub stato: Option<String>,
    pub data: Option<NaiveDate>,
    pub orario: Option<String>,
}
