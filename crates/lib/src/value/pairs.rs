//! Key-value pair collections with arbitrary keys.
//!
//! [`Pairs`] is the mergeable equivalent of a `Map`: unlike a
//! [`Record`](super::Record), its keys are full [`Value`]s, not strings.
//! Scalar keys compare by value; container keys compare by reference
//! identity, so two structurally identical records are two distinct keys.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use super::Value;

/// An insertion-ordered mapping from [`Value`] keys to [`Value`]s, behind a
/// shared handle.
///
/// Keys use the same equality as values in a [`ValueSet`](super::ValueSet):
/// SameValueZero-style, with containers keyed by identity. Keys are stored
/// as-is and are never merged or cloned structurally.
///
/// # Examples
///
/// ```
/// # use cyclemerge::{Pairs, Value};
/// let pairs = Pairs::new();
/// pairs.set("x", 42);
/// pairs.set(1, "one"); // non-string keys are fine
///
/// assert_eq!(pairs.get(&Value::from("x")), Some(Value::Int(42)));
/// assert_eq!(pairs.get(&Value::Int(1)), Some(Value::from("one")));
/// ```
#[derive(Debug, Clone)]
pub struct Pairs(Rc<RefCell<IndexMap<Value, Value>>>);

impl Pairs {
    /// Creates a new empty pair collection.
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(IndexMap::new())))
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Returns true if the collection has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Returns true if the collection contains the given key.
    pub fn contains_key(&self, key: &Value) -> bool {
        self.0.borrow().contains_key(key)
    }

    /// Gets the value for a key.
    pub fn get(&self, key: &Value) -> Option<Value> {
        self.0.borrow().get(key).cloned()
    }

    /// Sets the value for a key, returning the previous value if present.
    pub fn set(&self, key: impl Into<Value>, value: impl Into<Value>) -> Option<Value> {
        self.0.borrow_mut().insert(key.into(), value.into())
    }

    /// Removes a key, returning its value if present.
    pub fn remove(&self, key: &Value) -> Option<Value> {
        self.0.borrow_mut().shift_remove(key)
    }

    /// Returns the keys in insertion order.
    pub fn keys(&self) -> Vec<Value> {
        self.0.borrow().keys().cloned().collect()
    }

    /// Returns `(key, value)` entries in insertion order.
    pub fn entries(&self) -> Vec<(Value, Value)> {
        self.0
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Returns true if both handles point at the same underlying collection.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Stable address of the underlying allocation.
    pub fn ptr_id(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }
}

impl Default for Pairs {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> FromIterator<(K, V)> for Pairs
where
    K: Into<Value>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let pairs = Pairs::new();
        for (k, v) in iter {
            pairs.set(k, v);
        }
        pairs
    }
}
