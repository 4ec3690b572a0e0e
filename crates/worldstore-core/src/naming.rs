//! Resource naming: tags, name validation, and selector derivation.

use crate::{
    felt::Felt,
    hash::{poseidon_hash_many, starknet_keccak},
    serialize::encode_byte_array,
};
use thiserror::Error as ThisError;

pub const TAG_SEPARATOR: char = '-';

///
/// NamingError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum NamingError {
    #[error("Unexpected tag `{tag}`. Expected format: <NAMESPACE>{TAG_SEPARATOR}<NAME>")]
    InvalidTag { tag: String },

    #[error("Invalid name `{name}`: only [a-zA-Z0-9_] characters are allowed")]
    InvalidName { name: String },
}

/// Names are non-empty and limited to ASCII alphanumerics and underscores.
#[must_use]
pub fn is_name_valid(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || byte == b'_')
}

pub fn ensure_name_valid(name: &str) -> Result<(), NamingError> {
    if is_name_valid(name) {
        Ok(())
    } else {
        Err(NamingError::InvalidName {
            name: name.to_string(),
        })
    }
}

#[must_use]
pub fn get_tag(namespace: &str, name: &str) -> String {
    format!("{namespace}{TAG_SEPARATOR}{name}")
}

/// Split `namespace-name` into its two parts.
pub fn split_tag(tag: &str) -> Result<(&str, &str), NamingError> {
    let mut parts = tag.split(TAG_SEPARATOR);

    match (parts.next(), parts.next(), parts.next()) {
        (Some(namespace), Some(name), None) => Ok((namespace, name)),
        _ => Err(NamingError::InvalidTag {
            tag: tag.to_string(),
        }),
    }
}

#[must_use]
pub fn is_valid_tag(tag: &str) -> bool {
    split_tag(tag).is_ok_and(|(namespace, name)| is_name_valid(namespace) && is_name_valid(name))
}

/// Poseidon over the byte-array felt encoding of `value`.
#[must_use]
pub fn bytearray_hash(value: &str) -> Felt {
    let mut felts = Vec::new();
    encode_byte_array(value.as_bytes(), &mut felts);

    poseidon_hash_many(&felts)
}

#[must_use]
pub fn selector_from_hashes(namespace_hash: Felt, name_hash: Felt) -> Felt {
    poseidon_hash_many(&[namespace_hash, name_hash])
}

#[must_use]
pub fn selector_from_names(namespace: &str, name: &str) -> Felt {
    selector_from_hashes(bytearray_hash(namespace), bytearray_hash(name))
}

pub fn selector_from_tag(tag: &str) -> Result<Felt, NamingError> {
    let (namespace, name) = split_tag(tag)?;

    Ok(selector_from_names(namespace, name))
}

/// Field selector for a struct member.
#[must_use]
pub fn selector_from_name(name: &str) -> Felt {
    starknet_keccak(name.as_bytes())
}

///
/// TESTS
///
