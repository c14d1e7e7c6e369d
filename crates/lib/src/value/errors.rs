//! Error types for value operations.
//!
//! These cover the non-merge failure modes of the value model: typed
//! conversions that do not match the runtime shape, and JSON export of a
//! graph that contains a reference cycle.

use thiserror::Error;

/// Structured error types for value conversions and export.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ValueError {
    /// A typed conversion was attempted on a value of a different shape.
    #[error("value type mismatch: expected {expected}, found {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// A cyclic value graph was handed to an acyclic output format.
    #[error("cannot represent cyclic value: {context}")]
    CyclicValue { context: String },
}

impl ValueError {
    /// Check if this error is a type mismatch.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, ValueError::TypeMismatch { .. })
    }

    /// Check if this error was caused by a reference cycle.
    pub fn is_cyclic(&self) -> bool {
        matches!(self, ValueError::CyclicValue { .. })
    }
}

// Conversion from ValueError to the main Error type
impl From<ValueError> for crate::Error {
    fn from(err: ValueError) -> Self {
        crate::Error::Value(err)
    }
}
