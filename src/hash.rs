use std::fmt::{Display, Formatter};

use digest::Digest;
use proptest::{collection::vec, prelude::*, strategy::BoxedStrategy};

use crate::{error::Result, FromHex, ToHex};

/// A content hash, identifying a node by its logical fields.
///
/// The hash function is chosen by the caller, so the length is whatever the digest produces.
/// Child references are stored as raw hashes of any length.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Hash(Vec<u8>);

impl Display for Hash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

impl std::fmt::Debug for Hash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

impl Arbitrary for Hash {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        vec(any::<u8>(), 1..=32).prop_map(Hash::new).boxed()
    }
}

impl Hash {
    pub fn new<T: Into<Vec<u8>>>(data: T) -> Self {
        Hash(data.into())
    }

    pub fn from_slice(slice: &[u8]) -> Self {
        Hash(slice.to_vec())
    }

    pub fn from_hex(hex: &str) -> Result<Self> {
        Ok(Self(hex::decode(hex)?))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn digest<D: Digest>(data: &[u8]) -> Self {
        let mut hasher = D::new();
        hasher.update(data);
        Hash(hasher.finalize().to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for Hash {
    fn from(array: [u8; N]) -> Self {
        Hash(array.to_vec())
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl ToHex for Hash {
    fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl FromHex for Hash {
    fn from_hex(input: &str) -> Result<Self> {
        Hash::from_hex(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    test_to_hex!(Hash);

    #[test]
    fn test_display_is_hex() {
        let hash = Hash::from([0x70, 0x80, 0x90, 0xa0]);
        assert_eq!(hash.to_string(), "708090a0");
        assert_eq!(format!("{hash:?}"), "708090a0");
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert!(Hash::from_hex("zz").is_err());
        assert_eq!(Hash::from_hex(""), Ok(Hash::default()));
    }

    #[cfg(feature = "blake3")]
    #[test]
    fn test_digest_uses_full_output() {
        let hash = Hash::digest::<blake3::Hasher>(b"value");
        assert_eq!(hash.len(), 32);
        assert_eq!(hash.as_ref(), blake3::hash(b"value").as_bytes());
    }

    #[cfg(feature = "sha2")]
    #[test]
    fn test_digest_sha256() {
        let hash = Hash::digest::<sha2::Sha256>(b"");
        assert_eq!(
            hash.to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[cfg(feature = "blake2")]
    #[test]
    fn test_digest_blake2b() {
        assert_eq!(Hash::digest::<blake2::Blake2b512>(b"value").len(), 64);
    }
}
