use crate::{
    felt::{Felt, felt_from_usize},
    hash::poseidon_hash_many,
};

/// Address of a logical key path.
#[must_use]
pub fn storage_address(path: &[Felt]) -> Felt {
    poseidon_hash_many(path)
}

/// The `offset`-th slot of a contiguous run starting at `base`.
#[must_use]
pub fn slot_address(base: Felt, offset: usize) -> Felt {
    base + felt_from_usize(offset)
}

/// Base address of the value stored under `key` in table `model`.
#[must_use]
pub fn entity_base_address(model: Felt, key: Felt) -> Felt {
    storage_address(&[model, key])
}
