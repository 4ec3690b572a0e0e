//! Bit-packing codec for `Fixed` layouts.
//!
//! Values are concatenated little-end first into 251-bit storage words. A
//! value is never split across two words: when it does not fit in the bits
//! left in the current word, that word is flushed and the value starts a new
//! one. Full-width (251-bit) values always occupy a word of their own and
//! may hold any field element.

use crate::{
    felt::{FELT_BITS, Felt, biguint_to_felt, felt_bits, felt_to_biguint},
    obs::sink::{self, MetricsEvent},
};
use num_bigint::BigUint;
use thiserror::Error as ThisError;

///
/// PackingError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum PackingError {
    #[error("layout width {width} exceeds the {FELT_BITS}-bit word capacity")]
    WidthTooLarge { width: u8 },

    #[error("value {value:#x} does not fit in {width} bits")]
    ValueOverflow { value: Felt, width: u8 },

    #[error("mismatched input lengths: {values} values for {widths} widths")]
    LengthMismatch { values: usize, widths: usize },

    #[error("Unpack inner failed: packed input exhausted after {consumed} words")]
    Truncated { consumed: usize },
}

const fn check_width(width: u8) -> Result<(), PackingError> {
    if width > FELT_BITS {
        Err(PackingError::WidthTooLarge { width })
    } else {
        Ok(())
    }
}

fn low_mask(width: u8) -> BigUint {
    (BigUint::from(1_u8) << usize::from(width)) - 1_u8
}

/// Append one value to the word being assembled, flushing it to `packed`
/// first when fewer than `width` bits remain.
pub fn pack_inner(
    value: &Felt,
    width: u8,
    packing: &mut Felt,
    offset: &mut u8,
    packed: &mut Vec<Felt>,
) -> Result<(), PackingError> {
    check_width(width)?;
    if width < FELT_BITS && felt_bits(value) > u64::from(width) {
        return Err(PackingError::ValueOverflow {
            value: *value,
            width,
        });
    }

    let remaining = FELT_BITS - *offset;
    if remaining < width {
        packed.push(*packing);
        *packing = *value;
        *offset = width;

        return Ok(());
    }

    let merged = felt_to_biguint(packing) | (felt_to_biguint(value) << usize::from(*offset));
    *packing = biguint_to_felt(&merged);
    *offset += width;

    Ok(())
}

/// Extract the next `width`-bit value, pulling a fresh word from `packed`
/// when the current one has fewer than `width` bits left.
///
/// Returns `None` when another word is needed and `packed` is exhausted.
pub fn unpack_inner(
    width: u8,
    packed: &mut &[Felt],
    unpacking: &mut Felt,
    offset: &mut u8,
) -> Option<Felt> {
    let remaining = FELT_BITS.saturating_sub(*offset);
    if remaining < width {
        let (next, rest) = packed.split_first()?;
        *packed = rest;
        *unpacking = *next;
        *offset = 0;
    }

    if width == FELT_BITS {
        *offset = width;
        return Some(*unpacking);
    }

    let shifted = felt_to_biguint(unpacking) >> usize::from(*offset);
    *offset += width;

    Some(biguint_to_felt(&(shifted & low_mask(width))))
}

/// Pack `values` according to `widths`, appending the words to `out`.
///
/// The final partially filled word is always flushed, so any layout (even an
/// empty one) emits at least one word.
pub fn pack(out: &mut Vec<Felt>, values: &[Felt], widths: &[u8]) -> Result<(), PackingError> {
    if values.len() != widths.len() {
        return Err(PackingError::LengthMismatch {
            values: values.len(),
            widths: widths.len(),
        });
    }

    let start = out.len();
    let mut packing = Felt::ZERO;
    let mut offset = 0_u8;

    for (value, width) in values.iter().zip(widths) {
        pack_inner(value, *width, &mut packing, &mut offset, out)?;
    }
    out.push(packing);

    sink::record(MetricsEvent::PackedWords {
        words: (out.len() - start) as u64,
    });

    Ok(())
}

/// Inverse of [`pack`]: append one value per width to `out`.
pub fn unpack(out: &mut Vec<Felt>, packed: &[Felt], widths: &[u8]) -> Result<(), PackingError> {
    let total = packed.len();
    let mut input = packed;
    let mut unpacking = Felt::ZERO;
    let mut offset = FELT_BITS;

    for width in widths {
        check_width(*width)?;

        let value = unpack_inner(*width, &mut input, &mut unpacking, &mut offset).ok_or(
            PackingError::Truncated {
                consumed: total - input.len(),
            },
        )?;
        out.push(value);
    }

    Ok(())
}

/// Number of words [`pack`] emits for `widths`.
#[must_use]
pub fn calculate_packed_size(widths: &[u8]) -> usize {
    let mut size = 1;
    let mut partial = 0_usize;

    for width in widths {
        let width = usize::from(*width);
        partial += width;

        if partial > usize::from(FELT_BITS) {
            size += 1;
            partial = width;
        }
    }

    size
}

///
/// TESTS
///
