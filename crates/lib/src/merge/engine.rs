//! The recursive merge engine.
//!
//! This is the cycle-safe core: a memoized recursion that fills a shared
//! result cell per merge site. The cell for a site is published in the
//! [`MergeCache`] *before* the engine recurses into children, so any nested
//! recursion that arrives back at the same combination of inputs (a cycle)
//! finds the in-progress result and wires a back-reference to it instead of
//! recursing forever. Repeated cycles therefore converge to a single shared
//! container in the output.
//!
//! Inputs are never mutated; every merged container is a fresh allocation.
//! Leaves and single survivors pass through by handle, preserving identity.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::rc::Rc;

use indexmap::IndexSet;

use crate::merge::identity::IdentityRegistry;
use crate::value::{Category, List, Pairs, Record, Value, ValueSet};

/// The mutable box holding the in-progress or final value of one merge site.
///
/// Exactly one cell exists per distinct site per top-level call; descendants
/// that cycle back observe the (possibly still under construction) container
/// through it.
pub(crate) type ResultCell = Rc<RefCell<Value>>;

/// Creates an empty result cell.
pub(crate) fn new_cell() -> ResultCell {
    Rc::new(RefCell::new(Value::Missing))
}

/// Per-call memoization of merge sites.
///
/// Keys are the sorted, colon-joined registry ids of the containers that
/// participate in a site. Two sites share an entry exactly when their sorted
/// id tuples are identical.
#[derive(Debug, Default)]
pub(crate) struct MergeCache {
    entries: HashMap<String, ResultCell>,
}

impl MergeCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get(&self, key: &str) -> Option<&ResultCell> {
        self.entries.get(key)
    }

    pub(crate) fn insert(&mut self, key: String, cell: ResultCell) {
        self.entries.insert(key, cell);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Sorted, colon-joined id tuple for the containers in `run`.
///
/// Every member of `run` is mergeable and already registered by the time
/// this is called.
pub(crate) fn cache_key(run: &[&Value], registry: &IdentityRegistry) -> String {
    let mut ids: Vec<u64> = run
        .iter()
        .filter_map(|v| v.identity().and_then(|addr| registry.get(addr)))
        .collect();
    ids.sort_unstable();
    let mut key = String::with_capacity(ids.len() * 3);
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            key.push(':');
        }
        // write! to a String cannot fail
        let _ = write!(key, "{id}");
    }
    key
}

/// Recursively merges `candidates` into `cell`.
///
/// Communicates purely through the cell so that a not-yet-finished container
/// can already be referenced by its own descendants. The rules, in order:
/// absent candidates are dropped (an all-absent input resolves to the last
/// raw candidate, preserving the missing/null distinction); a single
/// survivor passes through unchanged; an opaque trailing candidate wins
/// outright; otherwise the maximal trailing run of same-category candidates
/// merges per category, and earlier candidates of other categories are
/// superseded entirely.
pub(crate) fn merge_into(
    cell: &ResultCell,
    candidates: &[Value],
    cache: &mut MergeCache,
    registry: &mut IdentityRegistry,
) {
    // Drop absent candidates, keeping the raw tail for the all-absent case.
    let survivors: Vec<&Value> = candidates.iter().filter(|v| !v.is_absent()).collect();
    if survivors.is_empty() {
        *cell.borrow_mut() = candidates.last().cloned().unwrap_or(Value::Missing);
        return;
    }

    // Assign registry ids to every mergeable survivor, in input order.
    for v in &survivors {
        if let Some(addr) = v.identity() {
            registry.register(addr);
        }
    }

    // Single survivor passes through by handle, same identity.
    if survivors.len() == 1 {
        *cell.borrow_mut() = survivors[0].clone();
        return;
    }

    // A non-mergeable tail wins outright over everything before it.
    let last = survivors[survivors.len() - 1];
    let category = last.category();
    if !category.is_mergeable() {
        *cell.borrow_mut() = last.clone();
        return;
    }

    // Maximal trailing run of candidates sharing the tail's category.
    let mut start = survivors.len() - 1;
    while start > 0 && survivors[start - 1].category() == category {
        start -= 1;
    }
    let run = &survivors[start..];

    // Cycle/memo check: publish this cell under the run's key before any
    // recursion, so a cycle back to the same combination finds it.
    let key = cache_key(run, registry);
    if let Some(hit) = cache.get(&key) {
        tracing::trace!(key = %key, "merge cache hit");
        let shared = hit.borrow().clone();
        *cell.borrow_mut() = shared;
        return;
    }
    cache.insert(key, Rc::clone(cell));

    match category {
        Category::Record => merge_records(cell, run, cache, registry),
        Category::List => merge_lists(cell, run, cache, registry),
        Category::Pairs => merge_pairs(cell, run, cache, registry),
        Category::Set => merge_sets(cell, run),
        // is_mergeable() was checked above
        Category::Absent | Category::Opaque => unreachable!(),
    }
}

/// Record run: key union in first-seen order, each key merged recursively.
fn merge_records(
    cell: &ResultCell,
    run: &[&Value],
    cache: &mut MergeCache,
    registry: &mut IdentityRegistry,
) {
    let records: Vec<Record> = run.iter().filter_map(|v| v.as_record().cloned()).collect();

    let out = Record::new();
    *cell.borrow_mut() = Value::Record(out.clone());

    let mut keys: IndexSet<String> = IndexSet::new();
    for record in &records {
        keys.extend(record.keys());
    }

    for key in keys {
        let slots: Vec<Value> = records
            .iter()
            .map(|record| record.get(&key).unwrap_or(Value::Missing))
            .collect();
        let nested = new_cell();
        merge_into(&nested, &slots, cache, registry);
        let merged = nested.borrow().clone();
        out.set(key, merged);
    }
}

/// List run: result length is the maximum run length; each index merges the
/// in-bounds slots, with missing elements dropped before the nested merge.
/// Explicit nulls reach the nested merge, where they count as absent unless
/// every slot at that index is absent.
fn merge_lists(
    cell: &ResultCell,
    run: &[&Value],
    cache: &mut MergeCache,
    registry: &mut IdentityRegistry,
) {
    let lists: Vec<List> = run.iter().filter_map(|v| v.as_list().cloned()).collect();

    let out = List::new();
    *cell.borrow_mut() = Value::List(out.clone());

    let max_len = lists.iter().map(List::len).max().unwrap_or(0);
    for index in 0..max_len {
        let slots: Vec<Value> = lists
            .iter()
            .filter_map(|list| list.get(index))
            .filter(|v| !v.is_missing())
            .collect();
        let nested = new_cell();
        merge_into(&nested, &slots, cache, registry);
        let merged = nested.borrow().clone();
        out.push(merged);
    }
}

/// Pairs run: key union in first-seen order; keys carry over as-is (scalars
/// by value, containers by identity) and are never merged themselves.
fn merge_pairs(
    cell: &ResultCell,
    run: &[&Value],
    cache: &mut MergeCache,
    registry: &mut IdentityRegistry,
) {
    let collections: Vec<Pairs> = run.iter().filter_map(|v| v.as_pairs().cloned()).collect();

    let out = Pairs::new();
    *cell.borrow_mut() = Value::Pairs(out.clone());

    let mut keys: IndexSet<Value> = IndexSet::new();
    for pairs in &collections {
        keys.extend(pairs.keys());
    }

    for key in keys {
        let slots: Vec<Value> = collections
            .iter()
            .map(|pairs| pairs.get(&key).unwrap_or(Value::Missing))
            .collect();
        let nested = new_cell();
        merge_into(&nested, &slots, cache, registry);
        let merged = nested.borrow().clone();
        out.set(key, merged);
    }
}

/// Set run: union in run order, duplicates collapsing by value for scalars
/// and by identity for containers. Elements are not merged recursively.
fn merge_sets(cell: &ResultCell, run: &[&Value]) {
    let out = ValueSet::new();
    *cell.borrow_mut() = Value::Set(out.clone());

    for set in run.iter().filter_map(|v| v.as_set()) {
        for element in set.to_vec() {
            out.insert(element);
        }
    }
}
