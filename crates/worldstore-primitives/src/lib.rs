//! Primitive scalar registry shared by the layout, schema, and derive layers.
//!
//! Every storable scalar maps to exactly one [`PrimitiveKind`]; its packed
//! bit widths and unpacked felt count come from a single registry table.

#[macro_use]
mod macros;

/// Usable bit capacity of one storage word.
pub const FELT_BITS: u8 = 251;

///
/// PrimitiveKind
///
/// Canonical scalar kind used for layout and schema derivation.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum PrimitiveKind {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    I8,
    I16,
    I32,
    I64,
    I128,
    Felt252,
    ClassHash,
    ContractAddress,
    EthAddress,
}

impl PrimitiveKind {
    /// Return the full metadata descriptor for one primitive kind.
    #[must_use]
    pub const fn metadata(self) -> PrimitiveMetadata {
        primitive_kind_registry!(metadata_from_registry, self)
    }

    /// Schema name, as it appears in `Ty::Primitive`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.metadata().name
    }

    /// Bit widths of the packed `Fixed` layout.
    #[must_use]
    pub const fn widths(self) -> &'static [u8] {
        self.metadata().widths
    }

    /// Number of felts a value occupies when unpacked.
    #[must_use]
    pub const fn felt_count(self) -> usize {
        self.metadata().widths.len()
    }

    #[must_use]
    pub const fn family(self) -> PrimitiveFamily {
        self.metadata().family
    }

    #[must_use]
    pub const fn is_signed(self) -> bool {
        self.metadata().is_signed
    }

    /// Resolve a schema name back to its kind.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        ALL_PRIMITIVE_KINDS
            .iter()
            .copied()
            .find(|kind| kind.name() == name)
    }
}

impl std::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

///
/// PrimitiveMetadata
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PrimitiveMetadata {
    pub name: &'static str,
    pub family: PrimitiveFamily,
    pub widths: &'static [u8],
    pub is_signed: bool,
}

///
/// PrimitiveFamily
///
/// Coarse grouping used when converting felts back into Rust scalars.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PrimitiveFamily {
    Bool,
    Unsigned,
    Signed,
    Word,
    Address,
}

/// Ordered list of all primitive kinds in registry order.
pub const ALL_PRIMITIVE_KINDS: [PrimitiveKind; 16] = primitive_kind_registry!(all_kinds_from_registry);

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_order_matches_declaration() {
        assert_eq!(ALL_PRIMITIVE_KINDS[0], PrimitiveKind::Bool);
        assert_eq!(ALL_PRIMITIVE_KINDS[15], PrimitiveKind::EthAddress);
    }

    #[test]
    fn widths_never_exceed_word_capacity() {
        for kind in ALL_PRIMITIVE_KINDS {
            assert!(!kind.widths().is_empty(), "{kind} has no widths");
            assert!(kind.widths().iter().all(|w| *w <= FELT_BITS), "{kind} too wide");
        }
    }

    #[test]
    fn u256_spans_two_felts() {
        assert_eq!(PrimitiveKind::U256.widths(), &[128, 128]);
        assert_eq!(PrimitiveKind::U256.felt_count(), 2);
    }

    #[test]
    fn names_round_trip() {
        for kind in ALL_PRIMITIVE_KINDS {
            assert_eq!(PrimitiveKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(PrimitiveKind::from_name("usize"), None);
    }
}
