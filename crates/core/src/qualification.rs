//! Qualification-call vocabulary and transcript handling.
//!
//! The qualification pipeline that produces call records is external; this
//! module only names the categorical values it emits and parses the
//! transcript payload, which arrives either as a proper JSON array or as a
//! JSON string containing one (older pipeline versions double-encode it).

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Qualification outcome
// ---------------------------------------------------------------------------

/// Outcome of the screening call. `esito_qualificazione` is free-form in the
/// store; these are the canonical values the pipeline emits.
pub const ESITO_QUALIFICATO: &str = "qualificato";
pub const ESITO_NON_QUALIFICATO: &str = "non_qualificato";
pub const ESITO_CALLBACK_RICHIESTO: &str = "callback_richiesto";

// ---------------------------------------------------------------------------
// Urgency / sentiment tags
// ---------------------------------------------------------------------------

pub const URGENZA_ALTA: &str = "alta";
pub const URGENZA_MEDIA: &str = "media";
pub const URGENZA_BASSA: &str = "bassa";
pub const VALID_URGENZE: &[&str] = &[URGENZA_ALTA, URGENZA_MEDIA, URGENZA_BASSA];

pub const SENTIMENT_POSITIVO: &str = "positivo";
pub const SENTIMENT_NEUTRO: &str = "neutro";
pub const SENTIMENT_NEGATIVO: &str = "negativo";
pub const SENTIMENT_OSTILE: &str = "ostile";
pub const VALID_SENTIMENTS: &[&str] = &[
    SENTIMENT_POSITIVO,
    SENTIMENT_NEUTRO,
    SENTIMENT_NEGATIVO,
    SENTIMENT_OSTILE,
];

/// Validate that `urgenza` is one of the allowed urgency tags.
pub fn validate_urgenza(urgenza: &str) -> Result<(), CoreError> {
    if VALID_URGENZE.contains(&urgenza) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid urgenza '{urgenza}'. Must be one of: {}",
            VALID_URGENZE.join(", ")
        )))
    }
}

/// Validate that `sentiment` is one of the allowed sentiment tags.
pub fn validate_sentiment(sentiment: &str) -> Result<(), CoreError> {
    if VALID_SENTIMENTS.contains(&sentiment) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid sentiment '{sentiment}'. Must be one of: {}",
            VALID_SENTIMENTS.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Transcript
// ---------------------------------------------------------------------------

/// Who spoke a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptRole {
    Agent,
    User,
}

/// One turn of the automated qualification call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptTurn {
    pub role: TranscriptRole,
    pub content: String,
}

/// Parse a raw transcript payload into ordered turns.
///
/// Accepts a JSON array of turns, a JSON string containing such an array,
/// or `null`/anything else (treated as an empty transcript). Turns that do
/// not match the `{role, content}` shape are dropped rather than failing the
/// whole transcript.
pub fn parse_transcript(raw: &serde_json::Value) -> Vec<TranscriptTurn> {
    let array = match raw {
        serde_json::Value::Array(items) => items.clone(),
        serde_json::Value::String(text) if text.trim_start().starts_with('[') => {
            match serde_json::from_str::<serde_json::Value>(text) {
                Ok(serde_json::Value::Array(items)) => items,
                _ => return Vec::new(),
            }
        }
        _ => return Vec::new(),
    };

    array
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}
