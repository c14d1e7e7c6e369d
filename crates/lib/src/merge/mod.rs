//! Deep, cycle-safe merging of value sequences.
//!
//! The public surface is [`merge`] (takes a [`Value`] that must be a list,
//! mirroring a dynamically typed call site) and [`merge_slice`] (takes a
//! slice directly and therefore cannot fail). Both walk the same engine:
//! candidates merge left to right, later values win, containers of the same
//! category deep-merge, and reference cycles in the inputs come out as
//! reference cycles in the output instead of infinite recursion.
//!
//! Each top-level call creates a fresh [`IdentityRegistry`] and merge cache
//! and discards them on return; nothing is shared across calls, so separate
//! merges never interfere.
//!
//! # Examples
//!
//! ```
//! use cyclemerge::{Record, Value, merge_slice};
//!
//! let a = Record::new();
//! a.set("name", "Alice");
//! a.set("age", 30);
//!
//! let b = Record::new();
//! b.set("name", "Bob");
//! b.set("city", "NYC");
//!
//! let merged = merge_slice(&[Value::from(a), Value::from(b)]);
//! let merged = merged.as_record().unwrap();
//! assert_eq!(merged.get_as::<String>("name"), Some("Bob".to_string()));
//! assert_eq!(merged.get_as::<i64>("age"), Some(30));
//! assert_eq!(merged.get_as::<String>("city"), Some("NYC".to_string()));
//! ```
//!
//! Self-referential inputs converge to a single shared node:
//!
//! ```
//! use cyclemerge::{Record, Value, merge_slice};
//!
//! let obj1 = Record::new();
//! obj1.set("a", 1);
//! obj1.set("me", obj1.clone());
//!
//! let obj2 = Record::new();
//! obj2.set("b", 2);
//!
//! let merged = merge_slice(&[Value::from(obj1), Value::from(obj2)]);
//! let merged = merged.as_record().unwrap();
//! let inner = merged.get_as::<cyclemerge::Record>("me").unwrap();
//! let inner_inner = inner.get_as::<cyclemerge::Record>("me").unwrap();
//! assert!(inner.ptr_eq(&inner_inner)); // cycle collapsed to one node
//! ```

mod engine;
pub mod errors;
pub mod identity;

pub use errors::{ERROR_NOT_ARRAY, MergeError};
pub use identity::IdentityRegistry;

use crate::Result;
use crate::value::Value;

use engine::{MergeCache, merge_into, new_cell};

/// Deeply merges the elements of a list value into a single value.
///
/// This is the dynamically checked entry point: `candidates` must be a
/// [`Value::List`], anything else fails with [`MergeError::NotAnArray`]
/// before any merge work happens. The list's elements are the merge
/// candidates, in order.
///
/// # Errors
///
/// Returns [`MergeError::NotAnArray`] when `candidates` is not a list.
/// No other input shape is an error.
pub fn merge(candidates: &Value) -> Result<Value> {
    let Some(list) = candidates.as_list() else {
        return Err(MergeError::NotAnArray.into());
    };
    Ok(merge_slice(&list.to_vec()))
}

/// Deeply merges an ordered slice of candidate values.
///
/// Infallible: a slice is statically an ordered sequence, so the single
/// failure mode of [`merge`] cannot occur. An empty slice yields
/// [`Value::Missing`]; a single candidate passes through with its identity
/// intact.
pub fn merge_slice(candidates: &[Value]) -> Value {
    let mut registry = IdentityRegistry::new();
    let mut cache = MergeCache::new();
    let cell = new_cell();
    merge_into(&cell, candidates, &mut cache, &mut registry);
    let merged = cell.borrow();
    merged.clone()
}
