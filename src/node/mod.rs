//! Nodes of a versioned, Merkleized AVL+ tree.
//!
//! A node with height 0 is a leaf and stores a key and an opaque value. Any other node is an
//! inner node: its key is the split key used for traversal and it references up to two children,
//! either by hash (as persisted) or by an owned, already loaded [`Node`].
//!
//! ```text
//!             inner (height 1, size 2)
//!              /                  \
//!     Unresolved(hash)      Resolved { node }
//!      leaf in storage        leaf in memory
//! ```
//!
//! Only the fields that the codec writes survive a round trip through storage: the child
//! pointers, the cached hash and the persisted flag are runtime state.
use std::fmt::{Display, Formatter};

use digest::Digest;
use proptest::prelude::*;

use crate::prelude::*;

pub mod codec;
mod validation;

pub use validation::validate;

/// One side of an inner node.
///
/// An empty hash is not a reference: `Unresolved` with an empty hash is the same side as
/// `Absent`, and a `Resolved` side with an empty hash is the same as one not hashed yet. Two sides
/// are equal when they carry the same reference and the same loaded node.
#[derive(Debug, Clone, Default)]
pub enum Child {
    #[default]
    Absent,

    /// Known only by hash; the node itself lives in storage.
    Unresolved(Hash),

    /// Loaded in memory. `hash` is `None` until the child has been hashed, in which case the
    /// side is written as an empty reference.
    Resolved { hash: Option<Hash>, node: Box<Node> },
}

impl Child {
    pub fn resolved(node: Node) -> Self {
        Child::Resolved {
            hash: node.hash.clone(),
            node: Box::new(node),
        }
    }

    /// The persisted reference of this side, if there is one.
    pub fn hash(&self) -> Option<&Hash> {
        let hash = match self {
            Child::Absent => None,
            Child::Unresolved(hash) => Some(hash),
            Child::Resolved { hash, .. } => hash.as_ref(),
        };

        hash.filter(|hash| !hash.is_empty())
    }

    pub fn node(&self) -> Option<&Node> {
        match self {
            Child::Resolved { node, .. } => Some(node),
            _ => None,
        }
    }

    pub fn is_present(&self) -> bool {
        self.hash().is_some() || self.node().is_some()
    }

    pub(crate) fn hash_bytes(&self) -> &[u8] {
        self.hash().map(Hash::as_bytes).unwrap_or_default()
    }
}

impl PartialEq for Child {
    fn eq(&self, other: &Self) -> bool {
        self.hash() == other.hash() && self.node() == other.node()
    }
}

impl Eq for Child {}

/// A tree node.
///
/// `Node::default()` is the zero node: height, size and version 0, no key, no value, no children.
/// It is not well-formed, but it is encodable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Node {
    pub key: Option<Vec<u8>>,
    pub value: Option<Vec<u8>>,
    pub height: i8,
    pub size: i64,
    pub version: i64,

    /// Content hash, filled in by [`Node::hash_with`]. Never serialized.
    pub hash: Option<Hash>,
    pub left: Child,
    pub right: Child,

    /// Whether the encoded node has been durably written. Never serialized.
    pub persisted: bool,
}

impl Node {
    pub fn leaf(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>, version: i64) -> Self {
        Self {
            key: Some(key.into()),
            value: Some(value.into()),
            height: 0,
            size: 1,
            version,
            ..Default::default()
        }
    }

    pub fn inner(
        key: impl Into<Vec<u8>>,
        height: i8,
        size: i64,
        version: i64,
        left: Child,
        right: Child,
    ) -> Self {
        Self {
            key: Some(key.into()),
            height,
            size,
            version,
            left,
            right,
            ..Default::default()
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.height == 0
    }

    pub fn key(&self) -> &[u8] {
        self.key.as_deref().unwrap_or_default()
    }

    pub fn left_hash(&self) -> Option<&Hash> {
        self.left.hash()
    }

    pub fn right_hash(&self) -> Option<&Hash> {
        self.right.hash()
    }

    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    pub fn mark_persisted(&mut self) {
        self.persisted = true;
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate(Some(self))
    }

    /// Computes the content hash of this node with digest `D`, caching it in `self.hash`.
    ///
    /// Resolved children without a hash are hashed first and their hashes recorded on this
    /// node's sides. A cached hash is returned as is.
    ///
    /// The preimage is the zigzag varints of height, size and version, followed by either the
    /// length-prefixed key and the length-prefixed `D(value)` for a leaf, or the length-prefixed
    /// left and right hashes for an inner node.
    pub fn hash_with<D: Digest>(&mut self) -> Hash {
        if let Some(hash) = &self.hash {
            return hash.clone();
        }

        if !self.is_leaf() {
            hash_child::<D>(&mut self.left);
            hash_child::<D>(&mut self.right);
        }

        let mut preimage = Vec::new();
        encode_varint(self.height.into(), &mut preimage);
        encode_varint(self.size, &mut preimage);
        encode_varint(self.version, &mut preimage);

        if self.is_leaf() {
            write_prefixed(self.key(), &mut preimage);
            let value = Hash::digest::<D>(self.value.as_deref().unwrap_or_default());
            write_prefixed(value.as_ref(), &mut preimage);
        } else {
            write_prefixed(self.left.hash_bytes(), &mut preimage);
            write_prefixed(self.right.hash_bytes(), &mut preimage);
        }

        let hash = Hash::digest::<D>(&preimage);
        self.hash = Some(hash.clone());
        hash
    }
}

fn hash_child<D: Digest>(child: &mut Child) {
    if let Child::Resolved { hash, node } = child {
        if hash.as_ref().map_or(true, Hash::is_empty) {
            *hash = Some(node.hash_with::<D>());
        }
    }
}

pub(crate) fn write_prefixed(bytes: &[u8], buf: &mut Vec<u8>) {
    encode_uvarint(bytes.len() as u64, buf);
    buf.extend_from_slice(bytes);
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let hex_or_empty = |hash: Option<&Hash>| hash.map(Hash::to_hex).unwrap_or_default();

        write!(
            f,
            "Node{{{}:{}@{} {};{}}}#{}",
            hex::encode_upper(self.key()),
            hex::encode_upper(self.value.as_deref().unwrap_or_default()),
            self.version,
            hex_or_empty(self.left_hash()).to_uppercase(),
            hex_or_empty(self.right_hash()).to_uppercase(),
            hex_or_empty(self.hash.as_ref()).to_uppercase(),
        )
    }
}

impl Arbitrary for Node {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        crate::testing::node().boxed()
    }
}
