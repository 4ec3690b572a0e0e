use crate::{
    MAX_ARRAY_LENGTH,
    felt::{Felt, felt_bits, felt_from_usize, felt_to_usize},
    hash::combine_key,
    meta::{FieldLayout, Layout},
    packing::{PackingError, calculate_packed_size, pack, unpack},
    storage::{FlatStorage, StagedStorage, entity_base_address},
};
use thiserror::Error as ThisError;

// byte arrays store data_len, pending_word and pending_len around the words
const BYTE_ARRAY_OVERHEAD: usize = 3;

///
/// EntityStorageError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum EntityStorageError {
    #[error("layout needs {needed} more values at offset {offset}, only {available} provided")]
    MissingValues {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("{count} values left over after writing the layout")]
    TrailingValues { count: usize },

    #[error("length {len:#x} exceeds the maximum array length {max}")]
    ArrayTooLong { len: Felt, max: u32 },

    #[error("invalid enum variant {variant:#x}")]
    InvalidVariant { variant: Felt },

    #[error("stored enum variant {variant:#x} has no layout")]
    UnknownVariant { variant: Felt },

    #[error("stored length {value:#x} is invalid")]
    InvalidLength { value: Felt },

    #[error(transparent)]
    Packing(#[from] PackingError),
}

///
/// EntityStorage
///
/// Maps a value's flat felt sequence onto storage slots following its
/// layout. `Fixed` groups are bit-packed into contiguous words; every other
/// layout recurses into children stored under derived keys.
///

#[derive(Clone, Copy, Debug)]
pub struct EntityStorage {
    domain: u32,
    max_array_length: u32,
}

impl EntityStorage {
    #[must_use]
    pub const fn new(domain: u32) -> Self {
        Self {
            domain,
            max_array_length: MAX_ARRAY_LENGTH,
        }
    }

    #[must_use]
    pub const fn with_max_array_length(mut self, max_array_length: u32) -> Self {
        self.max_array_length = max_array_length;
        self
    }

    #[must_use]
    pub const fn domain(&self) -> u32 {
        self.domain
    }

    /// Write `values` for `key` in table `model`; every value must be consumed.
    /// Nothing is written unless the whole layout is.
    pub fn write<S: FlatStorage + ?Sized>(
        &self,
        storage: &mut S,
        model: Felt,
        key: Felt,
        values: &[Felt],
        layout: &Layout,
    ) -> Result<(), EntityStorageError> {
        let mut staged = StagedStorage::new(&*storage);
        let mut offset = 0;
        self.write_layout(&mut staged, model, key, values, &mut offset, layout)?;

        match values.len() - offset {
            0 => {
                staged.prepare().apply(storage);
                Ok(())
            }
            count => Err(EntityStorageError::TrailingValues { count }),
        }
    }

    pub fn read<S: FlatStorage + ?Sized>(
        &self,
        storage: &S,
        model: Felt,
        key: Felt,
        layout: &Layout,
    ) -> Result<Vec<Felt>, EntityStorageError> {
        let mut out = Vec::new();
        self.read_layout(storage, model, key, &mut out, layout)?;

        Ok(out)
    }

    /// Zero every slot the stored value occupies, or none of them.
    pub fn delete<S: FlatStorage + ?Sized>(
        &self,
        storage: &mut S,
        model: Felt,
        key: Felt,
        layout: &Layout,
    ) -> Result<(), EntityStorageError> {
        let mut staged = StagedStorage::new(&*storage);
        self.delete_layout(&mut staged, model, key, layout)?;
        staged.prepare().apply(storage);

        Ok(())
    }

    // ------------------------------------------------------------------
    // write
    // ------------------------------------------------------------------

    fn write_layout<S: FlatStorage + ?Sized>(
        &self,
        storage: &mut S,
        model: Felt,
        key: Felt,
        values: &[Felt],
        offset: &mut usize,
        layout: &Layout,
    ) -> Result<(), EntityStorageError> {
        match layout {
            Layout::Fixed(widths) => self.write_fixed(storage, model, key, values, offset, widths),
            Layout::Struct(fields) => {
                for field in fields {
                    let child = combine_key(key, field.selector);
                    self.write_layout(storage, model, child, values, offset, &field.layout)?;
                }
                Ok(())
            }
            Layout::Tuple(items) => {
                for (index, item) in items.iter().enumerate() {
                    let child = combine_key(key, felt_from_usize(index));
                    self.write_layout(storage, model, child, values, offset, item)?;
                }
                Ok(())
            }
            Layout::FixedArray(item, len) => {
                for index in 0..*len {
                    let child = combine_key(key, Felt::from(index));
                    self.write_layout(storage, model, child, values, offset, item)?;
                }
                Ok(())
            }
            Layout::Array(item) => {
                let len = take(values, offset, 1)?[0];
                let count = self.input_length(len)?;

                storage.write(self.domain, entity_base_address(model, key), len);
                if is_silent(item) {
                    return Ok(());
                }
                for index in 0..count {
                    let child = combine_key(key, felt_from_usize(index));
                    self.write_layout(storage, model, child, values, offset, item)?;
                }
                Ok(())
            }
            Layout::ByteArray => {
                let data_len = values.get(*offset).copied().ok_or(
                    EntityStorageError::MissingValues {
                        offset: *offset,
                        needed: 1,
                        available: 0,
                    },
                )?;
                let words = self.input_length(data_len)?;
                let encoded = take(values, offset, words + BYTE_ARRAY_OVERHEAD)?;

                storage.write_many(self.domain, entity_base_address(model, key), encoded);
                Ok(())
            }
            Layout::Enum(variants) => {
                let variant = take(values, offset, 1)?[0];
                if felt_bits(&variant) > 8 {
                    return Err(EntityStorageError::InvalidVariant { variant });
                }
                let payload = find_variant(variants, variant)
                    .ok_or(EntityStorageError::InvalidVariant { variant })?;

                storage.write(self.domain, entity_base_address(model, key), variant);
                let child = combine_key(key, variant);
                self.write_layout(storage, model, child, values, offset, payload)
            }
        }
    }

    fn write_fixed<S: FlatStorage + ?Sized>(
        &self,
        storage: &mut S,
        model: Felt,
        key: Felt,
        values: &[Felt],
        offset: &mut usize,
        widths: &[u8],
    ) -> Result<(), EntityStorageError> {
        if widths.is_empty() {
            return Ok(());
        }

        let group = take(values, offset, widths.len())?;
        let mut packed = Vec::with_capacity(calculate_packed_size(widths));
        pack(&mut packed, group, widths)?;

        storage.write_many(self.domain, entity_base_address(model, key), &packed);

        Ok(())
    }

    // ------------------------------------------------------------------
    // read
    // ------------------------------------------------------------------

    fn read_layout<S: FlatStorage + ?Sized>(
        &self,
        storage: &S,
        model: Felt,
        key: Felt,
        out: &mut Vec<Felt>,
        layout: &Layout,
    ) -> Result<(), EntityStorageError> {
        let base = entity_base_address(model, key);

        match layout {
            Layout::Fixed(widths) => {
                if widths.is_empty() {
                    return Ok(());
                }
                let packed = storage.read_many(self.domain, base, calculate_packed_size(widths));
                unpack(out, &packed, widths)?;
            }
            Layout::Struct(fields) => {
                for field in fields {
                    let child = combine_key(key, field.selector);
                    self.read_layout(storage, model, child, out, &field.layout)?;
                }
            }
            Layout::Tuple(items) => {
                for (index, item) in items.iter().enumerate() {
                    let child = combine_key(key, felt_from_usize(index));
                    self.read_layout(storage, model, child, out, item)?;
                }
            }
            Layout::FixedArray(item, len) => {
                for index in 0..*len {
                    let child = combine_key(key, Felt::from(index));
                    self.read_layout(storage, model, child, out, item)?;
                }
            }
            Layout::Array(item) => {
                let len = storage.read(self.domain, base);
                let count = self.stored_length(len)?;

                out.push(len);
                if is_silent(item) {
                    return Ok(());
                }
                for index in 0..count {
                    let child = combine_key(key, felt_from_usize(index));
                    self.read_layout(storage, model, child, out, item)?;
                }
            }
            Layout::ByteArray => {
                let words = self.stored_length(storage.read(self.domain, base))?;
                out.extend(storage.read_many(self.domain, base, words + BYTE_ARRAY_OVERHEAD));
            }
            Layout::Enum(variants) => {
                let variant = storage.read(self.domain, base);
                let payload = find_variant(variants, variant)
                    .ok_or(EntityStorageError::UnknownVariant { variant })?;

                out.push(variant);
                self.read_layout(storage, model, combine_key(key, variant), out, payload)?;
            }
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // delete
    // ------------------------------------------------------------------

    fn delete_layout<S: FlatStorage + ?Sized>(
        &self,
        storage: &mut S,
        model: Felt,
        key: Felt,
        layout: &Layout,
    ) -> Result<(), EntityStorageError> {
        let base = entity_base_address(model, key);

        match layout {
            Layout::Fixed(widths) => {
                if !widths.is_empty() {
                    let zeros = vec![Felt::ZERO; calculate_packed_size(widths)];
                    storage.write_many(self.domain, base, &zeros);
                }
            }
            Layout::Struct(fields) => {
                for field in fields {
                    let child = combine_key(key, field.selector);
                    self.delete_layout(storage, model, child, &field.layout)?;
                }
            }
            Layout::Tuple(items) => {
                for (index, item) in items.iter().enumerate() {
                    let child = combine_key(key, felt_from_usize(index));
                    self.delete_layout(storage, model, child, item)?;
                }
            }
            Layout::FixedArray(item, len) => {
                for index in 0..*len {
                    let child = combine_key(key, Felt::from(index));
                    self.delete_layout(storage, model, child, item)?;
                }
            }
            Layout::Array(item) => {
                let count = self.stored_length(storage.read(self.domain, base))?;

                if !is_silent(item) {
                    for index in 0..count {
                        let child = combine_key(key, felt_from_usize(index));
                        self.delete_layout(storage, model, child, item)?;
                    }
                }
                storage.write(self.domain, base, Felt::ZERO);
            }
            Layout::ByteArray => {
                let words = self.stored_length(storage.read(self.domain, base))?;
                let zeros = vec![Felt::ZERO; words + BYTE_ARRAY_OVERHEAD];
                storage.write_many(self.domain, base, &zeros);
            }
            Layout::Enum(variants) => {
                let variant = storage.read(self.domain, base);
                let payload = find_variant(variants, variant)
                    .ok_or(EntityStorageError::UnknownVariant { variant })?;

                storage.write(self.domain, base, Felt::ZERO);
                self.delete_layout(storage, model, combine_key(key, variant), payload)?;
            }
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // lengths
    // ------------------------------------------------------------------

    fn input_length(&self, len: Felt) -> Result<usize, EntityStorageError> {
        self.bounded(len).ok_or(EntityStorageError::ArrayTooLong {
            len,
            max: self.max_array_length,
        })
    }

    fn stored_length(&self, len: Felt) -> Result<usize, EntityStorageError> {
        self.bounded(len)
            .ok_or(EntityStorageError::InvalidLength { value: len })
    }

    fn bounded(&self, len: Felt) -> Option<usize> {
        felt_to_usize(&len).filter(|count| {
            u32::try_from(*count).is_ok_and(|count| count <= self.max_array_length)
        })
    }
}

// Layouts that neither consume values nor touch storage.
fn is_silent(layout: &Layout) -> bool {
    match layout {
        Layout::Fixed(widths) => widths.is_empty(),
        Layout::Struct(fields) => fields.iter().all(|field| is_silent(&field.layout)),
        Layout::Tuple(items) => items.iter().all(is_silent),
        Layout::FixedArray(item, len) => *len == 0 || is_silent(item),
        Layout::Array(_) | Layout::ByteArray | Layout::Enum(_) => false,
    }
}

fn find_variant(variants: &[FieldLayout], variant: Felt) -> Option<&Layout> {
    variants
        .iter()
        .find(|field| field.selector == variant)
        .map(|field| &field.layout)
}

// Borrow the next `count` values and advance `offset` past them.
fn take<'v>(
    values: &'v [Felt],
    offset: &mut usize,
    count: usize,
) -> Result<&'v [Felt], EntityStorageError> {
    let available = values.len().saturating_sub(*offset);
    if available < count {
        return Err(EntityStorageError::MissingValues {
            offset: *offset,
            needed: count,
            available,
        });
    }

    let group = &values[*offset..*offset + count];
    *offset += count;

    Ok(group)
}
