//! Ordered list containers.
//!
//! A [`List`] is the mergeable equivalent of an array: an ordered sequence
//! of [`Value`]s behind a shared handle, so lists can contain themselves.

use std::cell::RefCell;
use std::rc::Rc;

use super::Value;

/// An ordered sequence of values with shared-reference semantics.
///
/// Like [`Record`](super::Record), cloning a `List` clones the handle, not
/// the storage, and equality between lists is reference identity.
///
/// # Examples
///
/// ```
/// # use cyclemerge::{List, Value};
/// let list = List::new();
/// list.push(1);
/// list.push(list.clone()); // [1, <self>]
///
/// assert_eq!(list.len(), 2);
/// assert!(list.get(1).unwrap().as_list().unwrap().ptr_eq(&list));
/// ```
#[derive(Debug, Clone)]
pub struct List(Rc<RefCell<Vec<Value>>>);

impl List {
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(Vec::new())))
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Returns true if the list has no elements.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Gets the element at `index`, `None` when out of bounds.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.borrow().get(index).cloned()
    }

    /// Gets an element with automatic type conversion.
    pub fn get_as<T>(&self, index: usize) -> Option<T>
    where
        T: for<'a> TryFrom<&'a Value>,
    {
        let value = self.get(index)?;
        T::try_from(&value).ok()
    }

    /// Appends a value to the end of the list.
    pub fn push(&self, value: impl Into<Value>) {
        self.0.borrow_mut().push(value.into());
    }

    /// Replaces the element at `index`, returning the old element.
    /// Returns `None` without writing when the index is out of bounds.
    pub fn set(&self, index: usize, value: impl Into<Value>) -> Option<Value> {
        let mut inner = self.0.borrow_mut();
        let slot = inner.get_mut(index)?;
        Some(std::mem::replace(slot, value.into()))
    }

    /// Returns the elements as an owned vector of shared handles.
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.borrow().clone()
    }

    /// Returns true if both handles point at the same underlying list.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Stable address of the underlying allocation.
    pub fn ptr_id(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }
}

impl Default for List {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Into<Value>> FromIterator<V> for List {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let list = List::new();
        for v in iter {
            list.push(v);
        }
        list
    }
}
