use crate::{felt::Felt, storage::FlatStorage};
use std::collections::HashMap;

///
/// StagedStorage
///
/// Read-through overlay that records writes instead of performing them.
/// Reads observe earlier staged writes; the underlying storage is untouched
/// until the prepared writes are applied.
///

pub struct StagedStorage<'s, S: ?Sized> {
    base: &'s S,
    pending: PreparedWrites,
}

impl<'s, S: FlatStorage + ?Sized> StagedStorage<'s, S> {
    #[must_use]
    pub fn new(base: &'s S) -> Self {
        Self {
            base,
            pending: PreparedWrites::default(),
        }
    }

    /// Release the overlay, keeping only the writes it recorded.
    #[must_use]
    pub fn prepare(self) -> PreparedWrites {
        self.pending
    }
}

impl<S: FlatStorage + ?Sized> FlatStorage for StagedStorage<'_, S> {
    fn read(&self, domain: u32, address: Felt) -> Felt {
        self.pending
            .slots
            .get(&(domain, address))
            .copied()
            .unwrap_or_else(|| self.base.read(domain, address))
    }

    fn write(&mut self, domain: u32, address: Felt, value: Felt) {
        self.pending.slots.insert((domain, address), value);
    }
}

///
/// PreparedWrites
///
/// Final slot values produced by a staged mutation, applied mechanically.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PreparedWrites {
    slots: HashMap<(u32, Felt), Felt>,
}

impl PreparedWrites {
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn apply<S: FlatStorage + ?Sized>(self, storage: &mut S) {
        for ((domain, address), value) in self.slots {
            storage.write(domain, address, value);
        }
    }
}
