//! Field-element helpers and the address-like newtypes built on top of them.

use derive_more::{Deref, Display, From};
use num_bigint::BigUint;

pub use starknet_types_core::felt::Felt;
pub use worldstore_primitives::FELT_BITS;

///
/// ContractAddress
///

#[derive(Clone, Copy, Debug, Default, Deref, Display, Eq, From, Hash, PartialEq)]
#[display("{_0:#x}")]
pub struct ContractAddress(pub Felt);

impl ContractAddress {
    pub const ZERO: Self = Self(Felt::ZERO);

    #[must_use]
    pub const fn felt(self) -> Felt {
        self.0
    }
}

impl From<u64> for ContractAddress {
    fn from(value: u64) -> Self {
        Self(Felt::from(value))
    }
}

///
/// ClassHash
///

#[derive(Clone, Copy, Debug, Default, Deref, Display, Eq, From, Hash, PartialEq)]
#[display("{_0:#x}")]
pub struct ClassHash(pub Felt);

///
/// EthAddress
///
/// Ethereum address held in the low 160 bits of a felt.
///

#[derive(Clone, Copy, Debug, Default, Deref, Display, Eq, Hash, PartialEq)]
#[display("{_0:#x}")]
pub struct EthAddress(Felt);

impl EthAddress {
    pub const BITS: u8 = 160;

    /// Wrap a felt, rejecting values wider than 160 bits.
    #[must_use]
    pub fn new(value: Felt) -> Option<Self> {
        (felt_bits(&value) <= u64::from(Self::BITS)).then_some(Self(value))
    }

    #[must_use]
    pub const fn felt(self) -> Felt {
        self.0
    }
}

///
/// U256
///
/// 256-bit unsigned integer stored as two 128-bit limbs.
///

#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct U256 {
    pub high: u128,
    pub low: u128,
}

impl U256 {
    pub const ZERO: Self = Self { high: 0, low: 0 };

    #[must_use]
    pub const fn new(high: u128, low: u128) -> Self {
        Self { high, low }
    }
}

impl From<u128> for U256 {
    fn from(low: u128) -> Self {
        Self { high: 0, low }
    }
}

// conversions

/// Interpret a felt as a non-negative big integer.
#[must_use]
pub fn felt_to_biguint(felt: &Felt) -> BigUint {
    BigUint::from_bytes_be(&felt.to_bytes_be())
}

/// Build a felt from a big integer, reducing modulo the field prime.
/// Values wider than 256 bits keep their low 32 bytes.
#[must_use]
pub fn biguint_to_felt(value: &BigUint) -> Felt {
    let bytes = value.to_bytes_be();
    let tail = &bytes[bytes.len().saturating_sub(32)..];

    let mut buf = [0_u8; 32];
    buf[32 - tail.len()..].copy_from_slice(tail);

    Felt::from_bytes_be(&buf)
}

/// Number of significant bits in the canonical representation.
#[must_use]
pub fn felt_bits(felt: &Felt) -> u64 {
    felt_to_biguint(felt).bits()
}

/// Narrow a felt to `u128` when it fits.
#[must_use]
pub fn felt_to_u128(felt: &Felt) -> Option<u128> {
    let bytes = felt.to_bytes_be();
    if bytes[..16].iter().any(|byte| *byte != 0) {
        return None;
    }

    let mut low = [0_u8; 16];
    low.copy_from_slice(&bytes[16..]);

    Some(u128::from_be_bytes(low))
}

/// Narrow a felt to `usize` when it fits.
#[must_use]
pub fn felt_to_usize(felt: &Felt) -> Option<usize> {
    felt_to_u128(felt).and_then(|value| usize::try_from(value).ok())
}

#[must_use]
pub fn felt_from_usize(value: usize) -> Felt {
    Felt::from(value as u64)
}

/// Field-wrap a signed integer: negatives map to `p - |value|`.
#[must_use]
pub fn felt_from_i128(value: i128) -> Felt {
    let magnitude = Felt::from(value.unsigned_abs());
    if value < 0 {
        Felt::ZERO - magnitude
    } else {
        magnitude
    }
}

/// Inverse of [`felt_from_i128`].
#[must_use]
pub fn felt_to_i128(felt: &Felt) -> Option<i128> {
    if let Some(positive) = felt_to_u128(felt) {
        return i128::try_from(positive).ok();
    }

    let magnitude = felt_to_u128(&(Felt::ZERO - *felt))?;
    if magnitude > i128::MIN.unsigned_abs() {
        return None;
    }

    Some(0_i128.wrapping_sub_unsigned(magnitude))
}

/// Felt from up to 31 big-endian bytes.
#[must_use]
pub fn felt_from_be_slice(bytes: &[u8]) -> Felt {
    debug_assert!(bytes.len() <= 31, "felt chunk wider than 31 bytes");

    let tail = &bytes[bytes.len().saturating_sub(31)..];
    let mut buf = [0_u8; 32];
    buf[32 - tail.len()..].copy_from_slice(tail);

    Felt::from_bytes_be(&buf)
}

/// Encode an ASCII tag of at most 31 characters as a short-string felt.
#[must_use]
pub fn short_string(value: &str) -> Felt {
    felt_from_be_slice(value.as_bytes())
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn u128_narrowing_rejects_wide_values() {
        assert_eq!(felt_to_u128(&Felt::from(u128::MAX)), Some(u128::MAX));
        assert_eq!(felt_to_u128(&(Felt::from(u128::MAX) + Felt::ONE)), None);
    }

    #[test]
    fn short_string_is_big_endian_ascii() {
        assert_eq!(short_string("ab"), Felt::from(0x6162_u64));
        assert_eq!(short_string(""), Felt::ZERO);
    }

    #[test]
    fn eth_address_rejects_wide_values() {
        let max = biguint_to_felt(&((BigUint::from(1_u8) << 160_usize) - 1_u8));
        assert!(EthAddress::new(max).is_some());
        assert!(EthAddress::new(max + Felt::ONE).is_none());
    }

    #[test]
    fn contract_address_displays_as_hex() {
        assert_eq!(ContractAddress::from(255_u64).to_string(), "0xff");
    }

    #[test]
    fn signed_extremes_survive_field_wrapping() {
        for value in [i128::MIN, -1, 0, 1, i128::MAX] {
            assert_eq!(felt_to_i128(&felt_from_i128(value)), Some(value));
        }
    }

    proptest! {
        #[test]
        fn signed_values_round_trip(value in any::<i128>()) {
            prop_assert_eq!(felt_to_i128(&felt_from_i128(value)), Some(value));
        }

        #[test]
        fn biguint_conversion_round_trips(value in any::<u128>()) {
            let felt = Felt::from(value);
            prop_assert_eq!(biguint_to_felt(&felt_to_biguint(&felt)), felt);
        }
    }
}
