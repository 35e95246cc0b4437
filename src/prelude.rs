pub use crate::{
    error::*,
    hash::Hash,
    node::{codec, validate, Child, Node},
    varint::*,
};

pub trait FromBytes
where
    Self: Sized,
{
    fn from_bytes(bytes: &[u8]) -> Result<Self>;
}

pub trait ToBytes {
    type Output: AsRef<[u8]>;

    /// Converts the value to a representation in bytes.
    fn to_bytes(&self) -> Self::Output;

    /// Checks if the value (as bytes) is zero.
    fn is_zero(&self) -> bool {
        self.to_bytes().as_ref().iter().all(|byte| *byte == 0)
    }
}

/// Exact length of what [`ToBytes::to_bytes`] will produce, computed without writing.
///
/// Storage layers use it to preallocate buffers, so it must never disagree with the writer.
pub trait EncodedSize {
    fn encoded_size(&self) -> usize;
}

pub trait FromHex
where
    Self: Sized,
{
    fn from_hex(hex: &str) -> Result<Self>;
}

pub trait ToHex {
    fn to_hex(&self) -> String;
}
