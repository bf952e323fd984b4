//! Identity-hash assignment.

use crate::value::{ArrayValue, NativeFunction, NativeObject, TranslatedObject, Value};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::{Arc, Weak};
use std::sync::atomic::{AtomicI32, Ordering};
use tracing::trace;

const FIRST_HASH: i32 = 1;

/// Dead entries are swept after every this many assignments.
pub const PRUNE_INTERVAL: i32 = 1024;

/// Weak handle to the object an entry was assigned to.
#[derive(Debug)]
enum Owner {
    Array(Weak<ArrayValue>),
    Function(Weak<NativeFunction>),
    Object(Weak<dyn TranslatedObject>),
    Native(Weak<NativeObject>),
}

impl Owner {
    fn of(value: &Value) -> Option<Owner> {
        Some(match value {
            Value::Array(a) => Owner::Array(Arc::downgrade(a)),
            Value::Function(f) => Owner::Function(Arc::downgrade(f)),
            Value::Object(o) => Owner::Object(Arc::downgrade(o)),
            Value::Native(n) => Owner::Native(Arc::downgrade(n)),
            _ => return None,
        })
    }

    fn is_alive(&self) -> bool {
        match self {
            Owner::Array(w) => w.strong_count() > 0,
            Owner::Function(w) => w.strong_count() > 0,
            Owner::Object(w) => w.strong_count() > 0,
            Owner::Native(w) => w.strong_count() > 0,
        }
    }
}

#[derive(Debug)]
struct IdentityEntry {
    owner: Owner,
    hash: i32,
}

/// Lazily assigned identity hashes, keyed by object address.
///
/// The first request for an object claims the next counter value; the claim
/// happens under the entry's shard lock, so concurrent first requests for the
/// same object all observe one hash. Entries hold weak references, which pin
/// the allocation, so an address stays unique while its entry exists. Dead
/// entries are dropped by [`IdentityHashTable::prune`], which also runs every
/// [`PRUNE_INTERVAL`] assignments.
#[derive(Debug)]
pub struct IdentityHashTable {
    entries: DashMap<usize, IdentityEntry>,
    next_hash: AtomicI32,
}

impl Default for IdentityHashTable {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityHashTable {
    pub fn new() -> Self {
        IdentityHashTable {
            entries: DashMap::new(),
            next_hash: AtomicI32::new(FIRST_HASH),
        }
    }

    /// Identity hash of a reference value; `None` for primitives and nullish
    /// values, which have no identity.
    pub fn hash_of(&self, value: &Value) -> Option<i32> {
        let address = value.address()?;
        let owner = Owner::of(value)?;
        let hash = match self.entries.entry(address) {
            Entry::Occupied(entry) => return Some(entry.get().hash),
            Entry::Vacant(entry) => {
                let hash = self.allocate();
                trace!(address, hash, "assigning identity hash");
                entry.insert(IdentityEntry { owner, hash });
                hash
            }
        };
        if hash % PRUNE_INTERVAL == 0 {
            let removed = self.prune();
            trace!(removed, "pruned identity hash table");
        }
        Some(hash)
    }

    fn allocate(&self) -> i32 {
        // Wraps like a Java int counter.
        self.next_hash.fetch_add(1, Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop entries whose object has died. Returns how many were removed.
    pub fn prune(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.owner.is_alive());
        before - self.entries.len()
    }

    /// Forget every assignment and restart the counter.
    pub fn reset(&self) {
        self.entries.clear();
        self.next_hash.store(FIRST_HASH, Ordering::SeqCst);
    }
}

#[cfg(test)]
#[path = "tests/identity_hash_tests.rs"]
mod tests;
