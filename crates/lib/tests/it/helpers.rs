//! Shared builders and assertions for the integration tests.

use cyclemerge::{List, Pairs, Record, Value, ValueSet};

/// Builds a record from `(key, value)` pairs.
pub fn record(entries: &[(&str, Value)]) -> Record {
    entries.iter().map(|(k, v)| (*k, v.clone())).collect()
}

/// Builds a list from values.
pub fn list(items: &[Value]) -> List {
    items.iter().cloned().collect()
}

/// Builds a pair collection from `(key, value)` pairs.
pub fn pairs(entries: &[(Value, Value)]) -> Pairs {
    entries.iter().cloned().collect()
}

/// Builds a set from values.
pub fn set(items: &[Value]) -> ValueSet {
    items.iter().cloned().collect()
}

/// Deterministic, cycle-aware rendering of a value, used to assert that
/// inputs are not mutated by a merge.
pub fn snapshot(value: &Value) -> String {
    value.to_string()
}

/// Extracts a record handle or panics with the actual type.
pub fn as_record(value: &Value) -> Record {
    value
        .as_record()
        .unwrap_or_else(|| panic!("expected record, found {}", value.type_name()))
        .clone()
}

/// Extracts a list handle or panics with the actual type.
pub fn as_list(value: &Value) -> List {
    value
        .as_list()
        .unwrap_or_else(|| panic!("expected list, found {}", value.type_name()))
        .clone()
}
