//! Error types for merge operations.
//!
//! Merging has exactly one failure mode: the top-level argument was not an
//! ordered sequence. Every other input shape, including empty, all-absent,
//! mixed-category and self-referential inputs, merges deterministically.

use thiserror::Error;

/// Fixed message raised when the merge argument is not a sequence.
pub const ERROR_NOT_ARRAY: &str = "Argument must be an array";

/// Structured error types for merge operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum MergeError {
    /// The value handed to [`merge`](crate::merge) was not a list.
    #[error("{ERROR_NOT_ARRAY}")]
    NotAnArray,
}

impl MergeError {
    /// Check if this error is an invalid-argument error.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, MergeError::NotAnArray)
    }
}

// Conversion from MergeError to the main Error type
impl From<MergeError> for crate::Error {
    fn from(err: MergeError) -> Self {
        crate::Error::Merge(err)
    }
}
