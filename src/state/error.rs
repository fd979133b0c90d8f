//! Error types for observable state access.

use thiserror::Error;

use crate::state::StateId;

/// Errors that can occur when reading or writing container fields.
///
/// All of these are programmer errors surfaced at the call site; none are
/// retried.
#[derive(Debug, Error)]
pub enum StateError {
    /// The field was not part of the container's initial field set.
    #[error("Unknown field '{field}' on {state}")]
    UnknownField { state: StateId, field: String },

    /// The field holds plain data where a nested container was expected.
    #[error("Field '{field}' on {state} does not hold a nested container")]
    NotNested { state: StateId, field: String },

    /// The field holds a nested container where plain data was expected.
    #[error("Field '{field}' on {state} holds a nested container, not data")]
    NotData { state: StateId, field: String },

    /// The stored value could not be decoded into the requested type.
    #[error("Failed to decode field '{field}' on {state}: {source}")]
    Decode {
        state: StateId,
        field: String,
        #[source]
        source: serde_json::Error,
    },

    /// The value could not be encoded for storage.
    #[error("Failed to encode value for field '{field}' on {state}: {source}")]
    Encode {
        state: StateId,
        field: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StateError {
    /// The field name the error refers to.
    pub fn field(&self) -> &str {
        match self {
            StateError::UnknownField { field, .. }
            | StateError::NotNested { field, .. }
            | StateError::NotData { field, .. }
            | StateError::Decode { field, .. }
            | StateError::Encode { field, .. } => field,
        }
    }
}
