//! Unique-value collections.
//!
//! [`ValueSet`] is the mergeable equivalent of a `Set`: an insertion-ordered
//! collection of distinct [`Value`]s behind a shared handle. Distinctness
//! follows value equality for scalars and reference identity for containers,
//! so two structurally identical records are two distinct elements.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexSet;

use super::Value;

/// An insertion-ordered set of values with shared-reference semantics.
///
/// # Examples
///
/// ```
/// # use cyclemerge::{Value, ValueSet};
/// let set = ValueSet::new();
/// assert!(set.insert(1));
/// assert!(set.insert(2));
/// assert!(!set.insert(1)); // duplicate
///
/// assert_eq!(set.len(), 2);
/// assert!(set.contains(&Value::Int(2)));
/// ```
#[derive(Debug, Clone)]
pub struct ValueSet(Rc<RefCell<IndexSet<Value>>>);

impl ValueSet {
    /// Creates a new empty set.
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(IndexSet::new())))
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Returns true if the set has no elements.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Returns true if the set contains the value.
    pub fn contains(&self, value: &Value) -> bool {
        self.0.borrow().contains(value)
    }

    /// Inserts a value, returning true if it was not already present.
    pub fn insert(&self, value: impl Into<Value>) -> bool {
        self.0.borrow_mut().insert(value.into())
    }

    /// Removes a value, returning true if it was present. Preserves the
    /// order of the remaining elements.
    pub fn remove(&self, value: &Value) -> bool {
        self.0.borrow_mut().shift_remove(value)
    }

    /// Returns the elements in insertion order.
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.borrow().iter().cloned().collect()
    }

    /// Returns true if both handles point at the same underlying set.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Stable address of the underlying allocation.
    pub fn ptr_id(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }
}

impl Default for ValueSet {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Into<Value>> FromIterator<V> for ValueSet {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let set = ValueSet::new();
        for v in iter {
            set.insert(v);
        }
        set
    }
}
