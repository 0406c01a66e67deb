use crate::types::RecordId;

/// Domain-level error type shared by every crate in the workspace.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// No record matches the given id in either store.
    #[error("{entity} with id {id} not found")]
    NotFound {
        entity: &'static str,
        id: RecordId,
    },

    /// A categorical or formatted value failed domain validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A concurrency-token mismatch or other conflicting write.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or invalid credential (operator token, calendar session).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Unexpected internal failure. The message is logged, never surfaced.
    #[error("Internal error: {0}")]
    Internal(String),
}
