//! Unsigned LEB128 varints and zigzag-mapped signed varints.
//!
//! Every numeric node field is a signed varint and every byte-sequence field is prefixed by its
//! length as an unsigned varint.

use crate::error::{Error, Result};

/// The longest encoding of a `u64`.
pub const MAX_VARINT_LEN: usize = 10;

/// Zigzag-map a signed integer so that small magnitudes of either sign stay small.
/// Maps: 0 -> 0, -1 -> 1, 1 -> 2, -2 -> 3, ...
#[inline]
pub fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

#[inline]
pub fn zigzag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ (-((value & 1) as i64))
}

/// Number of bytes [`encode_uvarint`] produces for `value`, always at least one.
#[inline]
pub fn uvarint_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}

#[inline]
pub fn varint_len(value: i64) -> usize {
    uvarint_len(zigzag_encode(value))
}

pub fn encode_uvarint(mut value: u64, buf: &mut Vec<u8>) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf.push(byte);
        if value == 0 {
            break;
        }
    }
}

pub fn encode_varint(value: i64, buf: &mut Vec<u8>) {
    encode_uvarint(zigzag_encode(value), buf)
}

/// Decode an unsigned varint from `buf` starting at `*pos`, advancing `*pos` past it.
///
/// `field` names what is being read, for error reporting.
pub fn decode_uvarint(buf: &[u8], pos: &mut usize, field: &'static str) -> Result<u64> {
    let mut result: u64 = 0;
    let mut shift: u32 = 0;

    for i in 0..MAX_VARINT_LEN {
        let Some(&byte) = buf.get(*pos) else {
            return Err(Error::Truncated { field });
        };
        *pos += 1;

        let payload = (byte & 0x7F) as u64;
        if i == MAX_VARINT_LEN - 1 && payload > 1 {
            return Err(Error::FailedDeserialization(format!(
                "varint overflow while reading {field}"
            )));
        }
        result |= payload << shift;

        if byte & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
    }

    Err(Error::FailedDeserialization(format!(
        "varint longer than {MAX_VARINT_LEN} bytes while reading {field}"
    )))
}

pub fn decode_varint(buf: &[u8], pos: &mut usize, field: &'static str) -> Result<i64> {
    decode_uvarint(buf, pos, field).map(zigzag_decode)
}
