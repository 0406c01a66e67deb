//! Acquisition-pipeline vocabulary and validation.
//!
//! A property moves through four operator-controlled steps (call, site
//! visit, agreement, preliminary contract). Each step has a state column,
//! a date column, and an HH:MM time column in store B; the enum below is the
//! single source of truth for the column names so repository updates can
//! never write an arbitrary field.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Coarse property status
// ---------------------------------------------------------------------------

pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_PENDING: &str = "pending";
pub const VALID_STATUSES: &[&str] = &[STATUS_APPROVED, STATUS_PENDING];

/// Operator-facing label for the coarse status, as shown in the lead list.
pub fn status_label(status: &str) -> &'static str {
    if status == STATUS_APPROVED {
        "Approvato"
    } else {
        "In attesa"
    }
}

/// Validate that `status` is one of the allowed coarse statuses.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Closer status (independent of the coarse status; never reconciled)
// ---------------------------------------------------------------------------

pub const CLOSER_STATUS_IN_LAVORAZIONE: &str = "in_lavorazione";
pub const CLOSER_STATUS_APPROVATO: &str = "approvato";
pub const CLOSER_STATUS_RIFIUTATO: &str = "rifiutato";
pub const VALID_CLOSER_STATUSES: &[&str] = &[
    CLOSER_STATUS_IN_LAVORAZIONE,
    CLOSER_STATUS_APPROVATO,
    CLOSER_STATUS_RIFIUTATO,
];

/// Validate that `closer_status` is one of the allowed values.
pub fn validate_closer_status(closer_status: &str) -> Result<(), CoreError> {
    if VALID_CLOSER_STATUSES.contains(&closer_status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid closer_status '{closer_status}'. Must be one of: {}",
            VALID_CLOSER_STATUSES.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Pipeline steps
// ---------------------------------------------------------------------------

// Step states, per step.
pub const STEP_CHIAMATA_DA_CONTATTARE: &str = "da_contattare";
pub const STEP_CHIAMATA_CONTATTATO: &str = "contattato";
pub const STEP_DA_ORGANIZZARE: &str = "da_organizzare";
pub const STEP_ORGANIZZATO: &str = "organizzato";
pub const STEP_ACCORDO_DA_INVIARE: &str = "da_inviare";
pub const STEP_ACCORDO_INVIATO: &str = "inviato";

/// One of the four acquisition milestones tracked on a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStep {
    Chiamata,
    Sopralluogo,
    Accordo,
    Preliminare,
}

impl PipelineStep {
    pub const ALL: &'static [PipelineStep] = &[
        PipelineStep::Chiamata,
        PipelineStep::Sopralluogo,
        PipelineStep::Accordo,
        PipelineStep::Preliminare,
    ];

    /// Store B column holding the step state.
    pub fn state_column(self) -> &'static str {
        match self {
            PipelineStep::Chiamata => "step_chiamata",
            PipelineStep::Sopralluogo => "step_sopralluogo",
            PipelineStep::Accordo => "step_accordo",
            PipelineStep::Preliminare => "step_preliminare",
        }
    }

    /// Store B column holding the scheduled date.
    pub fn date_column(self) -> &'static str {
        match self {
            PipelineStep::Chiamata => "step_chiamata_data",
            PipelineStep::Sopralluogo => "step_sopralluogo_data",
            PipelineStep::Accordo => "step_accordo_data",
            PipelineStep::Preliminare => "step_preliminare_data",
        }
    }

    /// Store B column holding the scheduled HH:MM time.
    pub fn time_column(self) -> &'static str {
        match self {
            PipelineStep::Chiamata => "step_chiamata_orario",
            PipelineStep::Sopralluogo => "step_sopralluogo_orario",
            PipelineStep::Accordo => "step_accordo_orario",
            PipelineStep::Preliminare => "step_preliminare_orario",
        }
    }

    /// The two states a step toggles between.
    pub fn valid_states(self) -> &'static [&'static str] {
        match self {
            PipelineStep::Chiamata => &[STEP_CHIAMATA_DA_CONTATTARE, STEP_CHIAMATA_CONTATTATO],
            PipelineStep::Sopralluogo | PipelineStep::Preliminare => {
                &[STEP_DA_ORGANIZZARE, STEP_ORGANIZZATO]
            }
            PipelineStep::Accordo => &[STEP_ACCORDO_DA_INVIARE, STEP_ACCORDO_INVIATO],
        }
    }

    /// The state a freshly created property starts each step in.
    pub fn default_state(self) -> &'static str {
        self.valid_states()[0]
    }

    /// The state that marks the step as done.
    pub fn done_state(self) -> &'static str {
        self.valid_states()[1]
    }

    /// Validate a requested step state against this step's vocabulary.
    pub fn validate_state(self, state: &str) -> Result<(), CoreError> {
        if self.valid_states().contains(&state) {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "Invalid state '{state}' for step '{self}'. Must be one of: {}",
                self.valid_states().join(", ")
            )))
        }
    }

    /// Whether an appointment can be booked for this step. Only the site
    /// visit and the preliminary contract are calendar-backed.
    pub fn is_bookable(self) -> bool {
        matches!(self, PipelineStep::Sopralluogo | PipelineStep::Preliminare)
    }
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStep::Chiamata => "chiamata",
            PipelineStep::Sopralluogo => "sopralluogo",
            PipelineStep::Accordo => "accordo",
            PipelineStep::Preliminare => "preliminare",
        };
        f.write_str(name)
    }
}

impl FromStr for PipelineStep {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chiamata" => Ok(PipelineStep::Chiamata),
            "sopralluogo" => Ok(PipelineStep::Sopralluogo),
            "accordo" => Ok(PipelineStep::Accordo),
            "preliminare" => Ok(PipelineStep::Preliminare),
            other => Err(CoreError::Validation(format!(
                "Unknown pipeline step '{other}'. Must be one of: chiamata, sopralluogo, accordo, preliminare"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// HH:MM validation
// ---------------------------------------------------------------------------

/// Validate a step time value (24h `HH:MM`).
pub fn validate_orario(orario: &str) -> Result<(), CoreError> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN
        .get_or_init(|| Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").expect("orario pattern"));

    if pattern.is_match(orario) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid orario '{orario}'. Expected HH:MM (24h)"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_round_trips_through_str() {
        for step in PipelineStep::ALL {
            let parsed: PipelineStep = step.to_string().parse().unwrap();
            assert_eq!(parsed, *step);
        }
    }

    #[test]
    fn unknown_step_is_rejected() {
        assert!("rogito".parse::<PipelineStep>().is_err());
    }

    #[test]
    fn chiamata_states() {
        let step = PipelineStep::Chiamata;
        assert!(step.validate_state("da_contattare").is_ok());
        assert!(step.validate_state("contattato").is_ok());
        assert!(step.validate_state("organizzato").is_err());
        assert_eq!(step.done_state(), "contattato");
    }

    #[test]
    fn accordo_states() {
        let step = PipelineStep::Accordo;
        assert!(step.validate_state("inviato").is_ok());
        assert!(step.validate_state("da_organizzare").is_err());
    }

    #[test]
    fn only_sopralluogo_and_preliminare_are_bookable() {
        assert!(PipelineStep::Sopralluogo.is_bookable());
        assert!(PipelineStep::Preliminare.is_bookable());
        assert!(!PipelineStep::Chiamata.is_bookable());
        assert!(!PipelineStep::Accordo.is_bookable());
    }

    #[test]
    fn state_columns_are_distinct() {
        let mut columns: Vec<&str> = PipelineStep::ALL
            .iter()
            .flat_map(|s| [s.state_column(), s.date_column(), s.time_column()])
            .collect();
        columns.sort_unstable();
        columns.dedup();
        assert_eq!(columns.len(), 12);
    }

    #[test]
    fn orario_accepts_24h_times() {
        assert!(validate_orario("09:30").is_ok());
        assert!(validate_orario("23:59").is_ok());
        assert!(validate_orario("00:00").is_ok());
    }

    #[test]
    fn orario_rejects_malformed_times() {
        assert!(validate_orario("24:00").is_err());
        assert!(validate_orario("9:30").is_err());
        assert!(validate_orario("09:60").is_err());
        assert!(validate_orario("domani").is_err());
    }

    #[test]
    fn status_labels() {
        assert_eq!(status_label("approved"), "Approvato");
        assert_eq!(status_label("pending"), "In attesa");
        // Anything unexpected falls back to the pending label.
        assert_eq!(status_label("draft"), "In attesa");
    }

    #[test]
    fn closer_status_validation() {
        assert!(validate_closer_status("in_lavorazione").is_ok());
        assert!(validate_closer_status("approvato").is_ok());
        assert!(validate_closer_status("rifiutato").is_ok());
        assert!(validate_closer_status("chiuso").is_err());
    }
}
