use crate::{
    felt::{Felt, felt_from_be_slice, felt_from_usize, felt_to_usize},
    serialize::{FeltReader, SerdeError},
};

/// Bytes held by each full word of a byte array.
pub const BYTES_IN_WORD: usize = 31;

/// Encode bytes as `[data_len, full_words.., pending_word, pending_len]`.
pub fn encode_byte_array(bytes: &[u8], out: &mut Vec<Felt>) {
    let full = bytes.len() / BYTES_IN_WORD;
    let (words, pending) = bytes.split_at(full * BYTES_IN_WORD);

    out.push(felt_from_usize(full));
    out.extend(words.chunks(BYTES_IN_WORD).map(felt_from_be_slice));
    out.push(felt_from_be_slice(pending));
    out.push(felt_from_usize(pending.len()));
}

pub fn decode_byte_array(reader: &mut FeltReader<'_>) -> Result<Vec<u8>, SerdeError> {
    let data_len = reader.next_felt()?;
    let data_len = felt_to_usize(&data_len)
        .filter(|len| *len <= reader.remaining())
        .ok_or_else(|| invalid(format!("word count {data_len:#x} is out of range")))?;

    let mut bytes = Vec::with_capacity(data_len.saturating_mul(BYTES_IN_WORD));
    for word in reader.take(data_len)? {
        push_word(&mut bytes, word, BYTES_IN_WORD)?;
    }

    let pending_word = reader.next_felt()?;
    let pending_len = reader.next_felt()?;
    let pending_len = felt_to_usize(&pending_len)
        .filter(|len| *len < BYTES_IN_WORD)
        .ok_or_else(|| invalid(format!("pending length {pending_len:#x} is out of range")))?;
    push_word(&mut bytes, &pending_word, pending_len)?;

    Ok(bytes)
}

// Append the low `len` bytes of `word`; every higher byte must be zero.
fn push_word(bytes: &mut Vec<u8>, word: &Felt, len: usize) -> Result<(), SerdeError> {
    let raw = word.to_bytes_be();
    let (high, low) = raw.split_at(raw.len() - len);

    if high.iter().any(|byte| *byte != 0) {
        return Err(invalid(format!("word {word:#x} exceeds {len} bytes")));
    }
    bytes.extend_from_slice(low);

    Ok(())
}

fn invalid(reason: String) -> SerdeError {
    SerdeError::InvalidByteArray { reason }
}
