//! Model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the store row
//! - `Deserialize` update DTOs (all `Option` fields) for operator edits

pub mod call;
pub mod property;

pub use call::Call;
pub use property::{Property, UpdateStep};
