//! Closer domain core.
//!
//! Pure domain logic with zero internal deps so it can be used by the
//! repository layer, the calendar integration, and the API crate alike:
//! lead reconciliation, search-query classification, the qualification and
//! pipeline vocabularies, and time-slot generation.

pub mod error;
pub mod lead;
pub mod pipeline;
pub mod qualification;
pub mod search;
pub mod slots;
pub mod types;
