//! Lead reconciliation: merging call records and property records into a
//! single dashboard row.
//!
//! The two stores are independently keyed; a lead exists only as the pairing
//! of a property and/or a call that share a lead id, falling back to a
//! whitespace-stripped phone match. The fallback is best-effort by design:
//! two people sharing a normalized phone substring will over-merge, and
//! inconsistent formatting will under-merge.

use indexmap::IndexMap;
use serde::Serialize;

use crate::pipeline::status_label;
use crate::types::{RecordId, Timestamp};

// ---------------------------------------------------------------------------
// Merge key
// ---------------------------------------------------------------------------

/// Which collection an unkeyed record came from. Keeps property-only and
/// call-only fallback keys from colliding on a shared UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordSource {
    Property,
    Call,
}

/// Identity of a lead across both stores.
///
/// The ambiguity of the join is explicit here: `Lead` is authoritative,
/// `Phone` is the best-effort fallback, `Record` scopes a row that carries
/// neither a lead id nor a phone to itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MergeKey {
    Lead(RecordId),
    Phone(String),
    Record(RecordSource, RecordId),
}

impl MergeKey {
    /// Keying rule shared by both collections: lead id if present, else the
    /// whitespace-stripped phone, else a record-scoped fallback.
    pub fn for_record(
        lead_id: Option<RecordId>,
        phone: &str,
        source: RecordSource,
        id: RecordId,
    ) -> MergeKey {
        if let Some(lead_id) = lead_id {
            return MergeKey::Lead(lead_id);
        }
        let normalized = normalize_phone(phone);
        if normalized.is_empty() {
            MergeKey::Record(source, id)
        } else {
            MergeKey::Phone(normalized)
        }
    }
}

/// Strip all whitespace from a phone number. `"+39 333 1234567"` and
/// `"+393331234567"` correlate to the same lead.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

// ---------------------------------------------------------------------------
// Lead summary
// ---------------------------------------------------------------------------

/// Which record anchors a merged row (the record whose id the row carries).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadKind {
    Property,
    Call,
}

/// One row of the unified lead list.
#[derive(Debug, Clone, Serialize)]
pub struct LeadSummary {
    pub id: RecordId,
    pub lead_id: Option<RecordId>,
    pub kind: LeadKind,
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
    pub last_interaction: Timestamp,
    pub status: String,
    pub has_property: bool,
    pub has_call: bool,
}

// ---------------------------------------------------------------------------
// Merge inputs
// ---------------------------------------------------------------------------

/// The property fields the merge consumes. The repository layer projects its
/// full row into this.
#[derive(Debug, Clone)]
pub struct PropertySeed {
    pub id: RecordId,
    pub lead_id: Option<RecordId>,
    pub nome: String,
    pub cognome: Option<String>,
    pub telefono: String,
    pub indirizzo: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
}

/// The call fields the merge consumes.
#[derive(Debug, Clone)]
pub struct CallSeed {
    pub id: RecordId,
    pub lead_id: Option<RecordId>,
    pub nome: String,
    pub telefono: String,
    pub esito_qualificazione: String,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Insertion-ordered accumulator for the reconciliation pass.
///
/// Feed every property first, then every call, both in creation order
/// (newest first, as the stores return them); call [`LeadMerge::into_sorted`]
/// to get the final rows. Ties on `last_interaction` keep insertion order.
#[derive(Debug, Default)]
pub struct LeadMerge {
    entries: IndexMap<MergeKey, LeadSummary>,
}

impl LeadMerge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a property row. A later property with the same key replaces
    /// the earlier value but keeps its position in the ordering.
    pub fn add_property(&mut self, property: PropertySeed) {
        let key = MergeKey::for_record(
            property.lead_id,
            &property.telefono,
            RecordSource::Property,
            property.id,
        );

        let cognome = property.cognome.as_deref().unwrap_or("");
        let name = format!("{} {}", property.nome, cognome).trim().to_string();

        self.entries.insert(
            key,
            LeadSummary {
                id: property.id,
                lead_id: property.lead_id,
                kind: LeadKind::Property,
                name,
                phone: property.telefono,
                address: Some(property.indirizzo),
                last_interaction: property.updated_at.unwrap_or(property.created_at),
                status: status_label(&property.status).to_string(),
                has_property: true,
                has_call: false,
            },
        );
    }

    /// Fold in a call row. On a key hit the existing entry gains the call
    /// flag, its status becomes the qualification outcome, and its
    /// `last_interaction` is raised to the call's creation time when later.
    pub fn add_call(&mut self, call: CallSeed) {
        let key = MergeKey::for_record(call.lead_id, &call.telefono, RecordSource::Call, call.id);

        if let Some(existing) = self.entries.get_mut(&key) {
            existing.has_call = true;
            existing.status = call.esito_qualificazione;
            if call.created_at > existing.last_interaction {
                existing.last_interaction = call.created_at;
            }
        } else {
            self.entries.insert(
                key,
                LeadSummary {
                    id: call.id,
                    lead_id: call.lead_id,
                    kind: LeadKind::Call,
                    name: call.nome,
                    phone: call.telefono,
                    address: None,
                    last_interaction: call.created_at,
                    status: call.esito_qualificazione,
                    has_property: false,
                    has_call: true,
                },
            );
        }
    }

    /// Finish the merge: rows sorted by `last_interaction` descending, ties
    /// broken by insertion order (stable sort).
    pub fn into_sorted(self) -> Vec<LeadSummary> {
        let mut rows: Vec<LeadSummary> = self.entries.into_values().collect();
        rows.sort_by(|a, b| b.last_interaction.cmp(&a.last_interaction));
        rows
    }
}

/// Pick the call that represents a lead in the detail view.
///
/// `calls` must be ordered newest-first. A call whose qualification outcome
/// is `qualificato` wins over recency; otherwise the most recent call wins.
pub fn pick_primary_call<T>(calls: &[T], esito: impl Fn(&T) -> &str) -> Option<&T> {
    calls
        .iter()
        .find(|c| esito(c) == crate::qualification::ESITO_QUALIFICATO)
        .or_else(|| calls.first())
}
