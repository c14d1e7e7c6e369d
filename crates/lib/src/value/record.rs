//! String-keyed record containers.
//!
//! A [`Record`] is the mergeable equivalent of a plain object: an
//! insertion-ordered mapping from string keys to [`Value`]s. Records are
//! shared handles; cloning a `Record` produces another handle to the same
//! underlying storage, which is what allows a record to contain itself.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use super::Value;

/// An insertion-ordered, string-keyed mapping with shared-reference semantics.
///
/// All mutation goes through `&self`: a `Record` behaves like an object
/// reference, not like an owned map. Two clones of the same `Record` observe
/// each other's writes, and equality between records (via [`Value`]) is
/// reference identity, never structural.
///
/// # Examples
///
/// ```
/// # use cyclemerge::{Record, Value};
/// let rec = Record::new();
/// rec.set("a", 1);
/// rec.set("self", rec.clone()); // self-referential, fine
///
/// assert_eq!(rec.get_as::<i64>("a"), Some(1));
/// assert!(rec.get("self").unwrap().as_record().unwrap().ptr_eq(&rec));
/// ```
#[derive(Debug, Clone)]
pub struct Record(Rc<RefCell<IndexMap<String, Value>>>);

impl Record {
    /// Creates a new empty record.
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(IndexMap::new())))
    }

    /// Returns the number of keys in the record.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Returns true if the record has no keys.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Returns true if the record contains the given key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.borrow().contains_key(key)
    }

    /// Gets the value for a key. Containers come back as shared handles.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.borrow().get(key).cloned()
    }

    /// Gets a value with automatic type conversion, `None` on a miss or a
    /// type mismatch.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: for<'a> TryFrom<&'a Value>,
    {
        let value = self.get(key)?;
        T::try_from(&value).ok()
    }

    /// Sets a value for a key, returning the previous value if present.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.borrow_mut().insert(key.into(), value.into())
    }

    /// Removes a key, returning its value if present. Preserves the order of
    /// the remaining keys.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.0.borrow_mut().shift_remove(key)
    }

    /// Returns the keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.0.borrow().keys().cloned().collect()
    }

    /// Returns `(key, value)` pairs in insertion order.
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.0
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Returns true if both handles point at the same underlying record.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Stable address of the underlying allocation, used as the record's
    /// identity for the lifetime of the handle.
    pub fn ptr_id(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let record = Record::new();
        for (k, v) in iter {
            record.set(k, v);
        }
        record
    }
}
