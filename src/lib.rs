//! Node layer of a versioned, Merkleized AVL+ tree.
//!
//! This crate owns the storage contract of a tree node: the byte encoding a node is persisted
//! with, the exact size of that encoding, and the structural invariants that separate leaves
//! from inner nodes. Tree mutation, proofs and the backing store live elsewhere.
//!
//! ```
//! use avlnode::prelude::*;
//!
//! let node = Node::leaf("key", "value", 3);
//!
//! let mut buf = Vec::with_capacity(node.encoded_size());
//! codec::write(Some(&node), &mut buf)?;
//! assert_eq!(buf.len(), node.encoded_size());
//!
//! let decoded = codec::read(&buf)?;
//! decoded.validate()?;
//! assert_eq!(decoded, node);
//! # Ok::<(), avlnode::Error>(())
//! ```

#[macro_export]
macro_rules! test_to_bytes {
    ($type:ty) => {
        $crate::__dependencies::paste::paste! {
            mod [<test_to_bytes_$type:snake>] {
                use $crate::__dependencies::{
                    proptest::prelude::*,
                    test_strategy,
                };

                use $crate::prelude::*;
                use super::$type;

                #[test]
                fn test_default_is_zero() {
                    assert!(<$type>::default().is_zero());
                }

                #[test_strategy::proptest(fork = false)]
                fn test_is_zero_is_same_as_zero_bytes(item: $type) {
                    prop_assert_eq!(
                        item.is_zero(),
                        item.to_bytes() == <$type>::default().to_bytes()
                    );
                }

                #[test_strategy::proptest(fork = false)]
                fn test_roundtrip(a: $type) {
                    prop_assert_eq!(a.clone(), <$type>::from_bytes(&a.to_bytes())?);
                }

                #[test_strategy::proptest(fork = false)]
                fn test_output_consistency(a: $type) {
                    prop_assert_eq!(a.to_bytes(), <$type>::from_bytes(&a.to_bytes())?.to_bytes());
                }

                #[test_strategy::proptest(fork = false)]
                fn test_is_different_on_different_objects(a: $type, b: $type) {
                    prop_assert_eq!(a == b, a.to_bytes() == b.to_bytes());
                }

                #[test_strategy::proptest(fork = false)]
                fn test_size_is_exact(a: $type) {
                    prop_assert_eq!(a.encoded_size(), a.to_bytes().len());
                }
            }
        }
    };
}

#[macro_export]
macro_rules! test_to_hex {
    ($type:ty) => {
        $crate::__dependencies::paste::paste! {
            mod [<test_to_hex_$type:snake>] {
                use $crate::__dependencies::{
                    proptest::prelude::*,
                    test_strategy,
                };

                use $crate::prelude::*;
                use super::$type;

                #[test_strategy::proptest(fork = false)]
                fn test_roundtrip(a: $type) {
                    prop_assert_eq!(a.clone(), <$type as FromHex>::from_hex(&a.to_hex())?);
                }

                #[test_strategy::proptest(fork = false)]
                fn test_output_consistency(a: $type) {
                    prop_assert_eq!(a.to_hex(), <$type as FromHex>::from_hex(&a.to_hex())?.to_hex());
                }

                #[test_strategy::proptest(fork = false)]
                fn test_is_different_on_different_objects(a: $type, b: $type) {
                    prop_assert_eq!(a == b, a.to_hex() == b.to_hex());
                }
            }
        }
    };
}

mod error;
mod hash;

pub mod node;
pub mod prelude;
pub mod testing;
pub mod varint;

pub use error::{Error, Result, ValidationError};
pub use hash::Hash;
pub use node::{codec, validate, Child, Node};
pub use prelude::{EncodedSize, FromBytes, FromHex, ToBytes, ToHex};

#[doc(hidden)]
/// This is a hidden module to make the macros defined on this crate available for the users.
pub mod __dependencies {
    pub use paste;
    pub use proptest;
    pub use test_strategy;
}
