//! Per-table entity index.
//!
//! The primary index is a dense array of ids plus an id → 1-based position
//! side map (0 means absent), giving O(1) existence checks and O(1)
//! delete-by-swap. The secondary index is an append-only id list per
//! `(table, key)`; it has no delete path.

mod keys;


use crate::{
    felt::{Felt, felt_from_usize, felt_to_usize},
    obs::sink::{self, MetricsEvent},
    storage::FlatStorage,
};
use keys::{item_address, key_item_address, key_length_address, length_address, position_address};
use thiserror::Error as ThisError;

///
/// IndexCorruption
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum IndexCorruption {
    #[error("index length {value:#x} for table {table:#x} is not a valid count")]
    InvalidLength { table: Felt, value: Felt },

    #[error("index position {value:#x} of id {id:#x} in table {table:#x} is out of bounds")]
    InvalidPosition { table: Felt, id: Felt, value: Felt },
}

///
/// IndexInsertOutcome
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IndexInsertOutcome {
    Inserted,
    Skipped,
}

///
/// IndexRemoveOutcome
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IndexRemoveOutcome {
    Removed,
    Skipped,
}

///
/// Index
///

#[derive(Clone, Copy, Debug)]
pub struct Index {
    domain: u32,
    zero_stale_slots: bool,
}

impl Index {
    #[must_use]
    pub const fn new(domain: u32) -> Self {
        Self {
            domain,
            zero_stale_slots: false,
        }
    }

    /// Clear the vacated last slot after a swap-delete instead of leaving
    /// the stale id behind.
    #[must_use]
    pub const fn with_zero_stale_slots(mut self, zero: bool) -> Self {
        self.zero_stale_slots = zero;
        self
    }

    #[must_use]
    pub const fn domain(&self) -> u32 {
        self.domain
    }

    /// Append `id` to the table; a no-op if it is already present.
    pub fn create<S: FlatStorage + ?Sized>(
        &self,
        storage: &mut S,
        table: Felt,
        id: Felt,
    ) -> Result<IndexInsertOutcome, IndexCorruption> {
        if self.exists(storage, table, id) {
            return Ok(IndexInsertOutcome::Skipped);
        }

        let len = self.len(storage, table)?;
        storage.write(self.domain, item_address(table, len), id);
        storage.write(
            self.domain,
            position_address(table, id),
            felt_from_usize(len + 1),
        );
        storage.write(self.domain, length_address(table), felt_from_usize(len + 1));

        sink::record(MetricsEvent::IndexDelta {
            table,
            inserts: 1,
            removes: 0,
        });

        Ok(IndexInsertOutcome::Inserted)
    }

    /// Remove `id` by moving the last id into its slot; a no-op if absent.
    pub fn delete<S: FlatStorage + ?Sized>(
        &self,
        storage: &mut S,
        table: Felt,
        id: Felt,
    ) -> Result<IndexRemoveOutcome, IndexCorruption> {
        let stored = storage.read(self.domain, position_address(table, id));
        if stored == Felt::ZERO {
            return Ok(IndexRemoveOutcome::Skipped);
        }

        let len = self.len(storage, table)?;
        let position = felt_to_usize(&stored)
            .filter(|position| (1..=len).contains(position))
            .ok_or(IndexCorruption::InvalidPosition {
                table,
                id,
                value: stored,
            })?;

        let removed = position - 1;
        let last = len - 1;
        if removed != last {
            let last_id = storage.read(self.domain, item_address(table, last));
            storage.write(self.domain, item_address(table, removed), last_id);
            storage.write(self.domain, position_address(table, last_id), stored);
        }
        if self.zero_stale_slots {
            storage.write(self.domain, item_address(table, last), Felt::ZERO);
        }

        storage.write(self.domain, position_address(table, id), Felt::ZERO);
        storage.write(self.domain, length_address(table), felt_from_usize(last));

        sink::record(MetricsEvent::IndexDelta {
            table,
            inserts: 0,
            removes: 1,
        });

        Ok(IndexRemoveOutcome::Removed)
    }

    #[must_use]
    pub fn exists<S: FlatStorage + ?Sized>(&self, storage: &S, table: Felt, id: Felt) -> bool {
        storage.read(self.domain, position_address(table, id)) != Felt::ZERO
    }

    pub fn len<S: FlatStorage + ?Sized>(
        &self,
        storage: &S,
        table: Felt,
    ) -> Result<usize, IndexCorruption> {
        let value = storage.read(self.domain, length_address(table));

        felt_to_usize(&value).ok_or(IndexCorruption::InvalidLength { table, value })
    }

    /// Live ids of `table`. Order is insertion order only until the first
    /// delete; swaps reorder it.
    pub fn query<S: FlatStorage + ?Sized>(
        &self,
        storage: &S,
        table: Felt,
    ) -> Result<Vec<Felt>, IndexCorruption> {
        let len = self.len(storage, table)?;

        Ok((0..len)
            .map(|position| storage.read(self.domain, item_address(table, position)))
            .collect())
    }

    /// Create `id` and, if it was not already present, append it to the
    /// secondary list of every key in `keys`.
    pub fn create_with_keys<S: FlatStorage + ?Sized>(
        &self,
        storage: &mut S,
        table: Felt,
        id: Felt,
        keys: &[Felt],
    ) -> Result<IndexInsertOutcome, IndexCorruption> {
        let outcome = self.create(storage, table, id)?;
        if outcome == IndexInsertOutcome::Skipped {
            return Ok(outcome);
        }

        for key in keys {
            let len = self.key_len(storage, table, *key)?;
            storage.write(self.domain, key_item_address(table, *key, len), id);
            storage.write(
                self.domain,
                key_length_address(table, *key),
                felt_from_usize(len + 1),
            );
        }

        Ok(outcome)
    }

    /// Ids recorded under `key` in the secondary index. Entries are never
    /// removed, so ids deleted from the primary index remain listed.
    pub fn get_by_key<S: FlatStorage + ?Sized>(
        &self,
        storage: &S,
        table: Felt,
        key: Felt,
    ) -> Result<Vec<Felt>, IndexCorruption> {
        let len = self.key_len(storage, table, key)?;

        Ok((0..len)
            .map(|position| storage.read(self.domain, key_item_address(table, key, position)))
            .collect())
    }

    fn key_len<S: FlatStorage + ?Sized>(
        &self,
        storage: &S,
        table: Felt,
        key: Felt,
    ) -> Result<usize, IndexCorruption> {
        let value = storage.read(self.domain, key_length_address(table, key));

        felt_to_usize(&value).ok_or(IndexCorruption::InvalidLength { table, value })
    }
}
