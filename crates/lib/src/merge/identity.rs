//! Reference-identity registry for merge inputs.
//!
//! The engine keys its memoization cache by *which* containers are being
//! combined, not by their contents. The registry hands out a stable integer
//! id per distinct container reference, assigned in first-seen order over
//! one top-level merge call. It is non-owning: it stores container
//! addresses, never handles, so registration does not extend any lifetime.
//! That is sound here because every registered container is kept alive by
//! the inputs for the duration of the call, and the registry is discarded
//! with the call.

use std::collections::HashMap;

/// Per-call map from container address to a unique, strictly increasing id.
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    ids: HashMap<usize, u64>,
    next: u64,
}

impl IdentityRegistry {
    /// Creates an empty registry with the counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id for `addr`, assigning the next counter value on first
    /// sight. Ids never change once assigned.
    pub fn register(&mut self, addr: usize) -> u64 {
        match self.ids.get(&addr) {
            Some(&id) => id,
            None => {
                let id = self.next;
                self.next += 1;
                self.ids.insert(addr, id);
                tracing::trace!(addr, id, "registered merge input");
                id
            }
        }
    }

    /// Looks up a previously registered address.
    pub fn get(&self, addr: usize) -> Option<u64> {
        self.ids.get(&addr).copied()
    }

    /// Number of distinct containers seen so far.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Resets the registry to its initial state.
    #[cfg(any(test, feature = "testing"))]
    pub fn reset(&mut self) {
        self.ids.clear();
        self.next = 0;
    }
}
