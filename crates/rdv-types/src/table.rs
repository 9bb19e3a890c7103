//! One worker's local view of the group: which name belongs to which id.

use std::collections::hash_map::{self, HashMap};

use crate::error::TypeError;
use crate::worker::{WorkerId, WorkerName};

/// Mapping from [`WorkerName`] to [`WorkerId`].
///
/// A name may be bound to at most one id. Inserting a name that is already
/// bound to a *different* id fails with [`TypeError::DuplicateName`];
/// inserting the exact same pair again is accepted and changes nothing.
///
/// Two tables compare equal when they hold the same pairs, regardless of
/// insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameTable {
    entries: HashMap<WorkerName, WorkerId>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
        }
    }

    /// Bind `name` to `id`.
    pub fn insert(&mut self, name: WorkerName, id: WorkerId) -> Result<(), TypeError> {
        match self.entries.entry(name) {
            hash_map::Entry::Occupied(slot) if *slot.get() == id => Ok(()),
            hash_map::Entry::Occupied(slot) => Err(TypeError::DuplicateName {
                name: slot.key().clone(),
                existing: *slot.get(),
                incoming: id,
            }),
            hash_map::Entry::Vacant(slot) => {
                slot.insert(id);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &WorkerName) -> Option<WorkerId> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &WorkerName) -> bool {
        self.entries.contains_key(name)
    }

    /// Reverse lookup. Linear in the table size.
    pub fn name_of(&self, id: WorkerId) -> Option<&WorkerName> {
        self.entries
            .iter()
            .find_map(|(name, bound)| (*bound == id).then_some(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&WorkerName, WorkerId)> {
        self.entries.iter().map(|(name, id)| (name, *id))
    }

    /// Entries ordered by worker id.
    pub fn sorted_by_id(&self) -> Vec<(WorkerId, WorkerName)> {
        let mut out: Vec<_> = self
            .entries
            .iter()
            .map(|(name, id)| (*id, name.clone()))
            .collect();
        out.sort();
        out
    }

    pub fn into_inner(self) -> HashMap<WorkerName, WorkerId> {
        self.entries
    }
}
