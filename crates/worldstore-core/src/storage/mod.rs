//! Flat slot storage and the layout-driven entity I/O built on top of it.

mod address;
mod entity;
mod staged;


pub use address::{entity_base_address, slot_address, storage_address};
pub use entity::{EntityStorage, EntityStorageError};
pub use staged::{PreparedWrites, StagedStorage};

use crate::felt::Felt;
use derive_more::Deref;
use std::collections::HashMap;

///
/// FlatStorage
///
/// Word-oriented persistent storage: one felt per slot, addressed by a
/// numeric domain and a felt address. Unwritten slots read as zero.
///

pub trait FlatStorage {
    fn read(&self, domain: u32, address: Felt) -> Felt;

    fn write(&mut self, domain: u32, address: Felt, value: Felt);

    /// Read `count` contiguous slots starting at `base`.
    fn read_many(&self, domain: u32, base: Felt, count: usize) -> Vec<Felt> {
        (0..count)
            .map(|offset| self.read(domain, slot_address(base, offset)))
            .collect()
    }

    /// Write `values` into contiguous slots starting at `base`.
    fn write_many(&mut self, domain: u32, base: Felt, values: &[Felt]) {
        for (offset, value) in values.iter().enumerate() {
            self.write(domain, slot_address(base, offset), *value);
        }
    }
}

///
/// MemoryStorage
///
/// In-memory flat storage. Zero writes drop the slot, so the map only holds
/// non-zero state.
///

#[derive(Clone, Debug, Default, Deref)]
pub struct MemoryStorage(HashMap<(u32, Felt), Felt>);

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Number of non-zero slots in `domain`.
    #[must_use]
    pub fn occupied(&self, domain: u32) -> usize {
        self.0.keys().filter(|(d, _)| *d == domain).count()
    }
}

impl FlatStorage for MemoryStorage {
    fn read(&self, domain: u32, address: Felt) -> Felt {
        self.0.get(&(domain, address)).copied().unwrap_or(Felt::ZERO)
    }

    fn write(&mut self, domain: u32, address: Felt, value: Felt) {
        if value == Felt::ZERO {
            self.0.remove(&(domain, address));
        } else {
            self.0.insert((domain, address), value);
        }
    }
}

impl<S: FlatStorage + ?Sized> FlatStorage for &mut S {
    fn read(&self, domain: u32, address: Felt) -> Felt {
        (**self).read(domain, address)
    }

    fn write(&mut self, domain: u32, address: Felt, value: Felt) {
        (**self).write(domain, address, value);
    }
}
