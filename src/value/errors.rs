use thiserror::Error;

use super::Value;

/// A lookup missed. This is an expected outcome, not a fault.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("key not found: {0}")]
pub struct NotFound(pub Value);

/**********************************************\
|* Converting between rust values and Values  *|
\*********************************************/
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InternalError {
    #[error(
        "Can't convert builtin type '{builtin_type}' to rust type '{rust_type}'"
    )]
    Conversion {
        builtin_type: String,
        rust_type: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapError {
    #[error(transparent)]
    Internal(#[from] InternalError),

    #[error(transparent)]
    NotFound(#[from] NotFound),

    /// The input sequence could not be classified as empty / non-empty, or
    /// one of its elements was not a key/value pair. Upstream bug; the
    /// operation is aborted.
    #[error("malformed sequence: expected {expected}, got {actual}")]
    MalformedSequence { expected: String, actual: String },
}

impl MapError {
    pub(crate) fn malformed(expected: &str, actual: &Value) -> Self {
        MapError::MalformedSequence {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

pub type MResult<T> = Result<T, MapError>;
