//! Cycle-safe deep merge for heterogeneous value graphs.
//!
//! This library deeply merges an ordered sequence of dynamically shaped
//! values (records, lists, pair collections, sets, or opaque scalars)
//! into a single combined value. It handles self-referential and mutually
//! referential inputs without infinite recursion, never mutates an input,
//! and preserves reference identity in the output: a cycle reachable from
//! the same merge site converges to one shared node.
//!
//! ## Core Concepts
//!
//! * **Values (`value::Value`)**: The dynamic value model. Containers are
//!   shared handles (cloning aliases them), which is how cycles are built
//!   and how the merged output expresses them.
//! * **Categories (`value::Category`)**: Runtime shape classification. Only
//!   same-category runs of containers deep-merge; a later value of a
//!   different category supersedes everything before it.
//! * **Merging (`merge::merge`, `merge::merge_slice`)**: The recursive
//!   engine. Per top-level call it threads an identity registry (stable ids
//!   per input container) and a merge cache (one shared result cell per
//!   distinct combination of inputs), which is what breaks cycles.
//! * **JSON (`value::json`)**: Import/export over `serde_json`, with cycle
//!   detection on export since JSON cannot express a cycle.

pub mod merge;
pub mod value;

pub use merge::{IdentityRegistry, MergeError, merge, merge_slice};
pub use value::{Category, List, Pairs, Record, Value, ValueError, ValueSet};

/// Result type used throughout the cyclemerge library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the cyclemerge library.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Structured merge errors from the merge module
    #[error(transparent)]
    Merge(merge::MergeError),

    /// Structured value errors from the value module
    #[error(transparent)]
    Value(value::ValueError),

    /// JSON (de)serialization errors
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Merge(_) => "merge",
            Error::Value(_) => "value",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error indicates an invalid merge argument.
    pub fn is_invalid_argument(&self) -> bool {
        match self {
            Error::Merge(merge_err) => merge_err.is_invalid_argument(),
            _ => false,
        }
    }

    /// Check if this error was caused by a reference cycle in an acyclic
    /// output format.
    pub fn is_cyclic(&self) -> bool {
        match self {
            Error::Value(value_err) => value_err.is_cyclic(),
            _ => false,
        }
    }
}
