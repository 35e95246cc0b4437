//! Storage encoding of a [`Node`].
//!
//! Fields are written in a fixed order, with no tag or framing:
//!
//! | field             | encoding                          | present on |
//! |-------------------|-----------------------------------|------------|
//! | height            | zigzag varint                     | all        |
//! | size              | zigzag varint                     | all        |
//! | version           | zigzag varint                     | all        |
//! | key               | uvarint length, bytes             | all        |
//! | value             | uvarint length, bytes             | leaves     |
//! | left, right hash  | uvarint length, bytes (each)      | inner      |
//!
//! A side without a hash reference is written as a zero length, and decodes back to
//! [`Child::Absent`].
use tracing::{debug, trace};

use super::write_prefixed;
use crate::prelude::*;

/// Exact number of bytes [`write`] produces for `node`.
pub fn encoded_size(node: &Node) -> usize {
    let mut size = varint_len(node.height.into())
        + varint_len(node.size)
        + varint_len(node.version)
        + prefixed_len(node.key());

    if node.is_leaf() {
        size += prefixed_len(node.value.as_deref().unwrap_or_default());
    } else {
        size += prefixed_len(node.left.hash_bytes()) + prefixed_len(node.right.hash_bytes());
    }

    size
}

fn prefixed_len(bytes: &[u8]) -> usize {
    uvarint_len(bytes.len() as u64) + bytes.len()
}

/// Appends the encoding of `node` to `buf`.
///
/// Fails only when there is no node to write.
pub fn write(node: Option<&Node>, buf: &mut Vec<u8>) -> Result<()> {
    encode(node.ok_or(Error::AbsentNode)?, buf);
    Ok(())
}

fn encode(node: &Node, buf: &mut Vec<u8>) {
    let start = buf.len();

    encode_varint(node.height.into(), buf);
    encode_varint(node.size, buf);
    encode_varint(node.version, buf);
    write_prefixed(node.key(), buf);

    if node.is_leaf() {
        write_prefixed(node.value.as_deref().unwrap_or_default(), buf);
    } else {
        write_prefixed(node.left.hash_bytes(), buf);
        write_prefixed(node.right.hash_bytes(), buf);
    }

    trace!(
        height = node.height,
        version = node.version,
        bytes = buf.len() - start,
        "encoded node"
    );
}

/// Decodes a node from exactly `bytes`.
///
/// The result is not validated, and its runtime fields are in their zero state.
pub fn read(bytes: &[u8]) -> Result<Node> {
    let node = Reader::new(bytes).read_node().inspect_err(|error| {
        debug!(%error, bytes = bytes.len(), "rejected encoded node");
    })?;

    trace!(
        height = node.height,
        version = node.version,
        bytes = bytes.len(),
        "decoded node"
    );

    Ok(node)
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn read_node(mut self) -> Result<Node> {
        let height = self.varint("height")?;
        let height = i8::try_from(height).map_err(|_| {
            Error::FailedDeserialization(format!("height {height} is out of range"))
        })?;
        let size = self.varint("size")?;
        let version = self.varint("version")?;
        let key = self.bytes("key")?.to_vec();

        let mut node = Node {
            key: Some(key),
            height,
            size,
            version,
            ..Default::default()
        };

        if node.is_leaf() {
            node.value = Some(self.bytes("value")?.to_vec());
        } else {
            node.left = self.child("left hash")?;
            node.right = self.child("right hash")?;
        }

        self.finish()?;

        Ok(node)
    }

    fn varint(&mut self, field: &'static str) -> Result<i64> {
        decode_varint(self.buf, &mut self.pos, field)
    }

    fn bytes(&mut self, field: &'static str) -> Result<&'a [u8]> {
        let declared = decode_uvarint(self.buf, &mut self.pos, field)?;
        let remaining = self.buf.len() - self.pos;

        let len = usize::try_from(declared)
            .ok()
            .filter(|len| *len <= remaining)
            .ok_or(Error::LengthMismatch {
                field,
                declared,
                remaining,
            })?;

        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn child(&mut self, field: &'static str) -> Result<Child> {
        let bytes = self.bytes(field)?;

        Ok(if bytes.is_empty() {
            Child::Absent
        } else {
            Child::Unresolved(Hash::from_slice(bytes))
        })
    }

    fn finish(self) -> Result<()> {
        match self.buf.len() - self.pos {
            0 => Ok(()),
            trailing => Err(Error::TrailingBytes(trailing)),
        }
    }
}

impl Node {
    /// Exact number of bytes [`Node::write_bytes`] appends.
    pub fn encoded_size(&self) -> usize {
        encoded_size(self)
    }

    pub fn write_bytes(&self, buf: &mut Vec<u8>) {
        encode(self, buf)
    }
}

impl EncodedSize for Node {
    fn encoded_size(&self) -> usize {
        encoded_size(self)
    }
}

impl ToBytes for Node {
    type Output = Vec<u8>;

    fn to_bytes(&self) -> Self::Output {
        let mut buf = Vec::with_capacity(self.encoded_size());
        self.write_bytes(&mut buf);
        buf
    }
}

impl FromBytes for Node {
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        read(bytes)
    }
}
