use crate::{
    felt::{FELT_BITS, Felt},
    packing::calculate_packed_size,
};
use thiserror::Error as ThisError;

///
/// LayoutError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum LayoutError {
    #[error("A packed model layout must contain Fixed layouts only.")]
    NotPackable,

    #[error("To be packed, all variants must have fixed layout of same size.")]
    VariantMismatch,

    #[error("layout width {width} exceeds the {FELT_BITS}-bit word capacity")]
    WidthTooLarge { width: u8 },
}

///
/// FieldLayout
///
/// A sub-layout tagged with its selector: a field selector inside a struct,
/// or the variant index inside an enum.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct FieldLayout {
    pub selector: Felt,
    pub layout: Layout,
}

impl FieldLayout {
    #[must_use]
    pub const fn new(selector: Felt, layout: Layout) -> Self {
        Self { selector, layout }
    }
}

///
/// Layout
///
/// Physical storage shape of a type.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Layout {
    /// One packed group of bit widths.
    Fixed(Vec<u8>),
    Struct(Vec<FieldLayout>),
    Tuple(Vec<Layout>),
    /// Dynamic array; the length is stored ahead of the items.
    Array(Box<Layout>),
    FixedArray(Box<Layout>, u32),
    ByteArray,
    Enum(Vec<FieldLayout>),
}

impl Layout {
    #[must_use]
    pub fn fixed(widths: &[u8]) -> Self {
        Self::Fixed(widths.to_vec())
    }

    /// Payload layout of a variant that carries no data.
    #[must_use]
    pub const fn unit() -> Self {
        Self::Fixed(Vec::new())
    }

    /// Merge children into a single `Fixed` layout.
    ///
    /// Tuples and fixed arrays of fixed layouts are flattened in order; any
    /// struct, dynamic array, enum, or byte array is rejected.
    pub fn packed(children: impl IntoIterator<Item = Self>) -> Result<Self, LayoutError> {
        let mut widths = Vec::new();
        for child in children {
            child.collect_packed_widths(&mut widths)?;
        }

        Ok(Self::Fixed(widths))
    }

    /// Packed enum: an 8-bit discriminant followed by the shared variant widths.
    pub fn packed_enum(variants: impl IntoIterator<Item = Self>) -> Result<Self, LayoutError> {
        let mut shared: Option<Vec<u8>> = None;

        for variant in variants {
            let mut widths = Vec::new();
            variant.collect_packed_widths(&mut widths)?;

            match &shared {
                None => shared = Some(widths),
                Some(first) if *first == widths => {}
                Some(_) => return Err(LayoutError::VariantMismatch),
            }
        }

        let mut widths = vec![8];
        widths.extend(shared.unwrap_or_default());

        Ok(Self::Fixed(widths))
    }

    fn collect_packed_widths(&self, out: &mut Vec<u8>) -> Result<(), LayoutError> {
        match self {
            Self::Fixed(widths) => {
                if let Some(width) = widths.iter().find(|width| **width > FELT_BITS) {
                    return Err(LayoutError::WidthTooLarge { width: *width });
                }
                out.extend_from_slice(widths);
            }
            Self::Tuple(items) => {
                for item in items {
                    item.collect_packed_widths(out)?;
                }
            }
            Self::FixedArray(item, len) => {
                for _ in 0..*len {
                    item.collect_packed_widths(out)?;
                }
            }
            Self::Struct(_) | Self::Array(_) | Self::ByteArray | Self::Enum(_) => {
                return Err(LayoutError::NotPackable);
            }
        }

        Ok(())
    }

    #[must_use]
    pub const fn is_packed(&self) -> bool {
        matches!(self, Self::Fixed(_))
    }

    #[must_use]
    pub fn widths(&self) -> Option<&[u8]> {
        match self {
            Self::Fixed(widths) => Some(widths),
            _ => None,
        }
    }

    /// Number of storage words a packed layout occupies.
    #[must_use]
    pub fn packed_size(&self) -> Option<usize> {
        self.widths().map(calculate_packed_size)
    }

    /// Sub-layout of the struct member identified by `selector`.
    #[must_use]
    pub fn find_field(&self, selector: Felt) -> Option<&Self> {
        match self {
            Self::Struct(fields) => fields
                .iter()
                .find(|field| field.selector == selector)
                .map(|field| &field.layout),
            _ => None,
        }
    }

    /// Payload layout of the enum variant identified by `variant`.
    #[must_use]
    pub fn find_variant(&self, variant: Felt) -> Option<&Self> {
        match self {
            Self::Enum(variants) => variants
                .iter()
                .find(|field| field.selector == variant)
                .map(|field| &field.layout),
            _ => None,
        }
    }

    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Fixed(_) => "fixed",
            Self::Struct(_) => "struct",
            Self::Tuple(_) => "tuple",
            Self::Array(_) => "array",
            Self::FixedArray(..) => "fixed_array",
            Self::ByteArray => "byte_array",
            Self::Enum(_) => "enum",
        }
    }
}
