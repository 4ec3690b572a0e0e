//! Content-addressing hashes.
//!
//! Storage addresses, entity ids, and resource selectors are all Poseidon
//! hashes over felt sequences; field selectors use the 250-bit Starknet keccak.

use crate::felt::Felt;
use sha3::{Digest, Keccak256};
use starknet_types_core::hash::{Poseidon, StarkHash};

/// Poseidon over an arbitrary felt sequence.
#[must_use]
pub fn poseidon_hash_many(felts: &[Felt]) -> Felt {
    Poseidon::hash_array(felts)
}

/// Derive a child key from a parent key and a discriminator (field selector,
/// tuple position, array index, or enum variant).
#[must_use]
pub fn combine_key(parent: Felt, child: Felt) -> Felt {
    poseidon_hash_many(&[parent, child])
}

/// Entity id of a record: the order-sensitive hash of its serialized keys.
#[must_use]
pub fn entity_id_from_keys(keys: &[Felt]) -> Felt {
    poseidon_hash_many(keys)
}

/// Keccak-256 truncated to 250 bits.
#[must_use]
pub fn starknet_keccak(bytes: &[u8]) -> Felt {
    let digest = Keccak256::digest(bytes);

    let mut buf = [0_u8; 32];
    buf.copy_from_slice(&digest);
    buf[0] &= 0x03;

    Felt::from_bytes_be(&buf)
}

///
/// TESTS
///
