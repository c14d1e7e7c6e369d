//! The dynamic value model.
//!
//! This module provides [`Value`], the runtime representation of the
//! heterogeneous inputs and outputs of a merge. Values are either leaves
//! (absent markers and opaque scalars) or containers (records, lists, pair
//! collections, sets). Containers are shared handles: cloning one clones the
//! reference, not the storage, which is how self-referential and mutually
//! referential structures are expressed.
//!
//! # Categories
//!
//! Every value classifies into exactly one [`Category`], determined purely
//! by runtime shape. The merge engine branches on categories; only the four
//! container categories ever merge, everything else is last-write-wins.
//!
//! # Equality
//!
//! `Value` equality follows SameValueZero: scalars compare by value (every
//! NaN equals NaN, `+0.0` equals `-0.0`), containers compare by reference
//! identity. This is the equality used for set elements and pair keys, and
//! it is stable under container mutation, so values are safe to use as hash
//! keys. For structural comparison of two separate graphs (cycles included)
//! use [`Value::deep_eq`].

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

// First declare the container modules, then the glue that depends on them
pub mod errors;
pub mod json;
pub mod list;
pub mod pairs;
pub mod record;
pub mod set;

pub use errors::ValueError;
pub use list::List;
pub use pairs::Pairs;
pub use record::Record;
pub use set::ValueSet;

/// A dynamically shaped value: an absent marker, an opaque scalar, or one of
/// the four mergeable container kinds.
///
/// # Absent values
///
/// `Missing` and `Null` are distinct: `Missing` is the absence of a value
/// (an unset record key, an empty merge), `Null` is an explicitly provided
/// null. Merging preserves the distinction, so a trailing `Null` input
/// produces `Null` while a trailing `Missing` produces `Missing`.
///
/// # Examples
///
/// ```
/// # use cyclemerge::{Category, Record, Value};
/// let rec = Record::new();
/// rec.set("a", 1);
///
/// let value = Value::from(rec);
/// assert_eq!(value.category(), Category::Record);
/// assert!(value.is_mergeable());
/// assert!(!Value::Null.is_mergeable());
/// ```
#[derive(Debug, Clone)]
pub enum Value {
    /// Absent: no value at all ("undefined").
    Missing,
    /// Absent: an explicit null.
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Integer scalar.
    Int(i64),
    /// Floating-point scalar.
    Float(f64),
    /// Text scalar.
    Text(String),
    /// Opaque binary blob; never merged, last write wins.
    Bytes(Vec<u8>),
    /// String-keyed mapping.
    Record(Record),
    /// Ordered sequence.
    List(List),
    /// Mapping with arbitrary value keys.
    Pairs(Pairs),
    /// Collection of unique values.
    Set(ValueSet),
}

/// The runtime shape of a [`Value`], as seen by the merge engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// String-keyed mapping ([`Value::Record`]).
    Record,
    /// Ordered sequence ([`Value::List`]).
    List,
    /// Arbitrary-keyed mapping ([`Value::Pairs`]).
    Pairs,
    /// Unique collection ([`Value::Set`]).
    Set,
    /// `Missing` or `Null`.
    Absent,
    /// Anything else; participates in merges only as last-write-wins.
    Opaque,
}

impl Category {
    /// Returns true for the four container categories that deep-merge.
    pub fn is_mergeable(self) -> bool {
        matches!(
            self,
            Category::Record | Category::List | Category::Pairs | Category::Set
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Record => "record",
            Category::List => "list",
            Category::Pairs => "pairs",
            Category::Set => "set",
            Category::Absent => "absent",
            Category::Opaque => "opaque",
        };
        write!(f, "{name}")
    }
}

impl Value {
    /// Classifies this value by runtime shape.
    pub fn category(&self) -> Category {
        match self {
            Value::Missing | Value::Null => Category::Absent,
            Value::Record(_) => Category::Record,
            Value::List(_) => Category::List,
            Value::Pairs(_) => Category::Pairs,
            Value::Set(_) => Category::Set,
            Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Text(_) | Value::Bytes(_) => {
                Category::Opaque
            }
        }
    }

    /// Returns true if this value is one of the four container kinds.
    pub fn is_mergeable(&self) -> bool {
        self.category().is_mergeable()
    }

    /// Returns true for `Missing` and `Null`.
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Missing | Value::Null)
    }

    /// Returns true for `Missing`.
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Returns true for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the type name as a string.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Missing => "missing",
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Record(_) => "record",
            Value::List(_) => "list",
            Value::Pairs(_) => "pairs",
            Value::Set(_) => "set",
        }
    }

    /// Reference identity of the underlying container, `None` for leaves.
    ///
    /// The address is stable for as long as any handle to the container is
    /// alive; it is what the merge engine registers ids against.
    pub fn identity(&self) -> Option<usize> {
        match self {
            Value::Record(r) => Some(r.ptr_id()),
            Value::List(l) => Some(l.ptr_id()),
            Value::Pairs(p) => Some(p.ptr_id()),
            Value::Set(s) => Some(s.ptr_id()),
            _ => None,
        }
    }

    /// Attempts to view this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to view this value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to view this value as a float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Attempts to view this value as text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to view this value as bytes.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Attempts to view this value as a record handle.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Attempts to view this value as a list handle.
    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// Attempts to view this value as a pair-collection handle.
    pub fn as_pairs(&self) -> Option<&Pairs> {
        match self {
            Value::Pairs(p) => Some(p),
            _ => None,
        }
    }

    /// Attempts to view this value as a set handle.
    pub fn as_set(&self) -> Option<&ValueSet> {
        match self {
            Value::Set(s) => Some(s),
            _ => None,
        }
    }

    /// Structural equality that tolerates cycles.
    ///
    /// Containers compare by shape and contents instead of identity; a pair
    /// of nodes already under comparison on the current path is assumed
    /// equal, which makes two isomorphic cyclic graphs compare equal without
    /// looping. Record comparison is key-set based, so insertion order does
    /// not matter. Pair keys and set elements still use identity for
    /// container keys, since that is how they are keyed in the first place.
    pub fn deep_eq(&self, other: &Value) -> bool {
        fn go(a: &Value, b: &Value, seen: &mut HashSet<(usize, usize)>) -> bool {
            match (a, b) {
                (Value::Record(x), Value::Record(y)) => {
                    if x.ptr_eq(y) {
                        return true;
                    }
                    if !seen.insert((x.ptr_id(), y.ptr_id())) {
                        return true;
                    }
                    if x.len() != y.len() {
                        return false;
                    }
                    x.entries().iter().all(|(k, va)| match y.get(k) {
                        Some(vb) => go(va, &vb, seen),
                        None => false,
                    })
                }
                (Value::List(x), Value::List(y)) => {
                    if x.ptr_eq(y) {
                        return true;
                    }
                    if !seen.insert((x.ptr_id(), y.ptr_id())) {
                        return true;
                    }
                    if x.len() != y.len() {
                        return false;
                    }
                    x.to_vec()
                        .iter()
                        .zip(y.to_vec().iter())
                        .all(|(va, vb)| go(va, vb, seen))
                }
                (Value::Pairs(x), Value::Pairs(y)) => {
                    if x.ptr_eq(y) {
                        return true;
                    }
                    if !seen.insert((x.ptr_id(), y.ptr_id())) {
                        return true;
                    }
                    if x.len() != y.len() {
                        return false;
                    }
                    x.entries().iter().all(|(k, va)| match y.get(k) {
                        Some(vb) => go(va, &vb, seen),
                        None => false,
                    })
                }
                (Value::Set(x), Value::Set(y)) => {
                    if x.ptr_eq(y) {
                        return true;
                    }
                    x.len() == y.len() && x.to_vec().iter().all(|v| y.contains(v))
                }
                _ => a == b,
            }
        }
        go(self, other, &mut HashSet::new())
    }
}

// SameValueZero equality: scalars by value, containers by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Missing, Value::Missing) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => (a.is_nan() && b.is_nan()) || a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a.ptr_eq(b),
            (Value::List(a), Value::List(b)) => a.ptr_eq(b),
            (Value::Pairs(a), Value::Pairs(b)) => a.ptr_eq(b),
            (Value::Set(a), Value::Set(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Missing | Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(n) => n.hash(state),
            Value::Float(x) => {
                // Canonicalize so that the Eq impl and the hash agree:
                // all NaNs hash alike, +0.0 and -0.0 hash alike.
                let bits = if x.is_nan() {
                    f64::NAN.to_bits()
                } else if *x == 0.0 {
                    0
                } else {
                    x.to_bits()
                };
                bits.hash(state);
            }
            Value::Text(s) => s.hash(state),
            Value::Bytes(b) => b.hash(state),
            Value::Record(r) => r.ptr_id().hash(state),
            Value::List(l) => l.ptr_id().hash(state),
            Value::Pairs(p) => p.ptr_id().hash(state),
            Value::Set(s) => s.ptr_id().hash(state),
        }
    }
}

// Cycle-aware display: a container already on the current path prints as
// "<cycle>" instead of recursing.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn go(value: &Value, f: &mut fmt::Formatter<'_>, path: &mut Vec<usize>) -> fmt::Result {
            if let Some(id) = value.identity() {
                if path.contains(&id) {
                    return write!(f, "<cycle>");
                }
                path.push(id);
            }
            let result = match value {
                Value::Missing => write!(f, "missing"),
                Value::Null => write!(f, "null"),
                Value::Bool(b) => write!(f, "{b}"),
                Value::Int(n) => write!(f, "{n}"),
                Value::Float(x) => write!(f, "{x}"),
                Value::Text(s) => write!(f, "{s:?}"),
                Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
                Value::Record(r) => {
                    write!(f, "{{")?;
                    for (i, (k, v)) in r.entries().iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{k}: ")?;
                        go(v, f, path)?;
                    }
                    write!(f, "}}")
                }
                Value::List(l) => {
                    write!(f, "[")?;
                    for (i, v) in l.to_vec().iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        go(v, f, path)?;
                    }
                    write!(f, "]")
                }
                Value::Pairs(p) => {
                    write!(f, "map{{")?;
                    for (i, (k, v)) in p.entries().iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        go(k, f, path)?;
                        write!(f, " => ")?;
                        go(v, f, path)?;
                    }
                    write!(f, "}}")
                }
                Value::Set(s) => {
                    write!(f, "set{{")?;
                    for (i, v) in s.to_vec().iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        go(v, f, path)?;
                    }
                    write!(f, "}}")
                }
            };
            if value.identity().is_some() {
                path.pop();
            }
            result
        }
        go(self, f, &mut Vec::new())
    }
}

// Convenient From implementations for common types
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value as f64)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Value::Record(value)
    }
}

impl From<List> for Value {
    fn from(value: List) -> Self {
        Value::List(value)
    }
}

impl From<Pairs> for Value {
    fn from(value: Pairs) -> Self {
        Value::Pairs(value)
    }
}

impl From<ValueSet> for Value {
    fn from(value: ValueSet) -> Self {
        Value::Set(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

// TryFrom implementations for typed extraction
impl TryFrom<&Value> for bool {
    type Error = ValueError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_bool().ok_or_else(|| ValueError::TypeMismatch {
            expected: "bool".to_string(),
            actual: value.type_name().to_string(),
        })
    }
}

impl TryFrom<&Value> for i64 {
    type Error = ValueError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_int().ok_or_else(|| ValueError::TypeMismatch {
            expected: "i64".to_string(),
            actual: value.type_name().to_string(),
        })
    }
}

impl TryFrom<&Value> for f64 {
    type Error = ValueError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_float().ok_or_else(|| ValueError::TypeMismatch {
            expected: "f64".to_string(),
            actual: value.type_name().to_string(),
        })
    }
}

impl TryFrom<&Value> for String {
    type Error = ValueError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value
            .as_text()
            .map(str::to_string)
            .ok_or_else(|| ValueError::TypeMismatch {
                expected: "String".to_string(),
                actual: value.type_name().to_string(),
            })
    }
}

impl TryFrom<&Value> for Vec<u8> {
    type Error = ValueError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value
            .as_bytes()
            .map(<[u8]>::to_vec)
            .ok_or_else(|| ValueError::TypeMismatch {
                expected: "Vec<u8>".to_string(),
                actual: value.type_name().to_string(),
            })
    }
}

impl TryFrom<&Value> for Record {
    type Error = ValueError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value
            .as_record()
            .cloned()
            .ok_or_else(|| ValueError::TypeMismatch {
                expected: "Record".to_string(),
                actual: value.type_name().to_string(),
            })
    }
}

impl TryFrom<&Value> for List {
    type Error = ValueError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value
            .as_list()
            .cloned()
            .ok_or_else(|| ValueError::TypeMismatch {
                expected: "List".to_string(),
                actual: value.type_name().to_string(),
            })
    }
}

impl TryFrom<&Value> for Pairs {
    type Error = ValueError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value
            .as_pairs()
            .cloned()
            .ok_or_else(|| ValueError::TypeMismatch {
                expected: "Pairs".to_string(),
                actual: value.type_name().to_string(),
            })
    }
}

impl TryFrom<&Value> for ValueSet {
    type Error = ValueError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value
            .as_set()
            .cloned()
            .ok_or_else(|| ValueError::TypeMismatch {
                expected: "ValueSet".to_string(),
                actual: value.type_name().to_string(),
            })
    }
}

// PartialEq implementations for comparing Value with primitives
impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        match self {
            Value::Text(s) => s == other,
            _ => false,
        }
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<String> for Value {
    fn eq(&self, other: &String) -> bool {
        self == other.as_str()
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        matches!(self, Value::Int(n) if n == other)
    }
}

impl PartialEq<i32> for Value {
    fn eq(&self, other: &i32) -> bool {
        matches!(self, Value::Int(n) if *n == *other as i64)
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        matches!(self, Value::Bool(b) if b == other)
    }
}

// Reverse implementations for symmetry
impl PartialEq<Value> for str {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

impl PartialEq<Value> for &str {
    fn eq(&self, other: &Value) -> bool {
        other == *self
    }
}

impl PartialEq<Value> for String {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

impl PartialEq<Value> for i64 {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

impl PartialEq<Value> for i32 {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

impl PartialEq<Value> for bool {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}
