// File: src/error.rs
// Purpose: Construction-time schema errors

use thiserror::Error;

/// A rule set that cannot be compiled into a validator.
///
/// Raised eagerly when a [`FormManager`](crate::FormManager) is constructed.
/// Validation failures during submit or blur are never errors; they are
/// reported through the error map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSchemaError {
    #[error("schema contains a field with an empty name")]
    EmptyFieldName,

    #[error("field \"{field}\": min_length {min} is greater than max_length {max}")]
    LengthBounds { field: String, min: usize, max: usize },

    #[error("field \"{field}\": lowercase and uppercase cannot both be set")]
    ConflictingCase { field: String },

    #[error("field \"{field}\": email min_domain_segments must be at least 1")]
    ZeroDomainSegments { field: String },

    #[error("field \"{field}\": email TLD allow list is empty")]
    EmptyTldList { field: String },

    #[error("field \"{field}\": one_of list is empty")]
    EmptyAllowList { field: String },

    #[error("field \"{field}\": invalid pattern /{pattern}/: {reason}")]
    BadPattern {
        field: String,
        pattern: String,
        reason: String,
    },
}

impl InvalidSchemaError {
    /// Field the error refers to, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::EmptyFieldName => None,
            Self::LengthBounds { field, .. }
            | Self::ConflictingCase { field }
            | Self::ZeroDomainSegments { field }
            | Self::EmptyTldList { field }
            | Self::EmptyAllowList { field }
            | Self::BadPattern { field, .. } => Some(field),
        }
    }
}
