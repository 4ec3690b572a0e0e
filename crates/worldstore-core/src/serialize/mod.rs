//! Felt-sequence serialization.
//!
//! Every storable value flattens to a sequence of felts: scalars take one
//! felt, `U256` takes two (low, high), arrays are length-prefixed, enums are
//! discriminant-prefixed, and strings use the byte-array encoding.

mod byte_array;
mod impls;

pub use byte_array::{BYTES_IN_WORD, decode_byte_array, encode_byte_array};

use crate::felt::Felt;
use thiserror::Error as ThisError;

///
/// SerdeError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum SerdeError {
    #[error("unexpected end of felt input at position {position}")]
    UnexpectedEnd { position: usize },

    #[error("felt {value:#x} is out of range for {ty}")]
    OutOfRange { ty: &'static str, value: Felt },

    #[error("invalid variant {variant:#x} for {ty}")]
    InvalidVariant { ty: &'static str, variant: Felt },

    #[error("invalid byte array: {reason}")]
    InvalidByteArray { reason: String },

    #[error("{count} trailing felts after deserialization")]
    TrailingFelts { count: usize },
}

///
/// FeltSerde
///

pub trait FeltSerde: Sized {
    fn serialize(&self, out: &mut Vec<Felt>);

    fn deserialize(reader: &mut FeltReader<'_>) -> Result<Self, SerdeError>;

    fn to_felts(&self) -> Vec<Felt> {
        let mut out = Vec::new();
        self.serialize(&mut out);

        out
    }

    /// Deserialize a value that must consume all of `felts`.
    fn from_felts(felts: &[Felt]) -> Result<Self, SerdeError> {
        let mut reader = FeltReader::new(felts);
        let value = Self::deserialize(&mut reader)?;
        reader.finish()?;

        Ok(value)
    }
}

///
/// FeltReader
/// Forward-only cursor over a felt slice.
///

#[derive(Clone, Debug)]
pub struct FeltReader<'a> {
    felts: &'a [Felt],
    position: usize,
}

impl<'a> FeltReader<'a> {
    #[must_use]
    pub const fn new(felts: &'a [Felt]) -> Self {
        Self { felts, position: 0 }
    }

    pub fn next_felt(&mut self) -> Result<Felt, SerdeError> {
        let felt = self
            .felts
            .get(self.position)
            .copied()
            .ok_or(SerdeError::UnexpectedEnd {
                position: self.position,
            })?;
        self.position += 1;

        Ok(felt)
    }

    pub fn take(&mut self, count: usize) -> Result<&'a [Felt], SerdeError> {
        let end = self
            .position
            .checked_add(count)
            .filter(|end| *end <= self.felts.len())
            .ok_or(SerdeError::UnexpectedEnd {
                position: self.felts.len(),
            })?;
        let slice = &self.felts[self.position..end];
        self.position = end;

        Ok(slice)
    }

    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.felts.len() - self.position
    }

    /// Fail if any input is left unread.
    pub const fn finish(&self) -> Result<(), SerdeError> {
        match self.remaining() {
            0 => Ok(()),
            count => Err(SerdeError::TrailingFelts { count }),
        }
    }
}

#[cfg(test)]
mod tests;
