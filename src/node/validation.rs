use tracing::debug;

use crate::prelude::*;

/// Checks the structural invariants of a node, reporting the first one violated.
///
/// * Every node has a key (possibly empty) and a version of at least 1.
/// * A leaf has a value (possibly empty), a size of exactly 1 and no children.
/// * An inner node has no value, a size of at least 1 and a reference on at least one side.
///
/// A single populated side is enough for an inner node.
pub fn validate(node: Option<&Node>) -> Result<(), ValidationError> {
    check(node).inspect_err(|error| debug!(%error, "invalid node"))
}

fn check(node: Option<&Node>) -> Result<(), ValidationError> {
    let node = node.ok_or(ValidationError::AbsentNode)?;

    if node.key.is_none() {
        return Err(ValidationError::MissingKey);
    }

    if node.height < 0 {
        return Err(ValidationError::NegativeHeight(node.height));
    }

    if node.is_leaf() {
        if node.value.is_none() {
            return Err(ValidationError::LeafWithoutValue);
        }
        if node.size != 1 {
            return Err(ValidationError::LeafSize(node.size));
        }
        check_version(node)?;
        if node.left.is_present() || node.right.is_present() {
            return Err(ValidationError::LeafWithChildren);
        }
    } else {
        if node.value.is_some() {
            return Err(ValidationError::InnerWithValue);
        }
        check_version(node)?;
        if node.size < 1 {
            return Err(ValidationError::Size(node.size));
        }
        if !node.left.is_present() && !node.right.is_present() {
            return Err(ValidationError::InnerWithoutChildren);
        }
    }

    Ok(())
}

fn check_version(node: &Node) -> Result<(), ValidationError> {
    match node.version {
        version if version < 1 => Err(ValidationError::Version(version)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use test_strategy::proptest;

    use super::*;

    const K: &[u8] = b"key";
    const V: &[u8] = b"value";

    fn h() -> Child {
        Child::Unresolved(Hash::from([1, 2, 3]))
    }

    fn c() -> Child {
        Child::resolved(Node::leaf("child", "x", 1))
    }

    fn leaf() -> Node {
        Node::leaf(K, V, 1)
    }

    fn inner(left: Child, right: Child) -> Node {
        Node::inner(K, 1, 1, 1, left, right)
    }

    #[test]
    fn test_absent_node() {
        assert_eq!(validate(None), Err(ValidationError::AbsentNode));
    }

    #[test]
    fn test_leaves() {
        let cases: Vec<(&str, Node, Result<(), ValidationError>)> = vec![
            ("leaf", leaf(), Ok(())),
            (
                "nil key",
                Node { key: None, ..leaf() },
                Err(ValidationError::MissingKey),
            ),
            ("empty key", Node::leaf(b"", V, 1), Ok(())),
            (
                "nil value",
                Node { value: None, ..leaf() },
                Err(ValidationError::LeafWithoutValue),
            ),
            ("empty value", Node::leaf(K, b"", 1), Ok(())),
            (
                "version 0",
                Node::leaf(K, V, 0),
                Err(ValidationError::Version(0)),
            ),
            (
                "version -1",
                Node::leaf(K, V, -1),
                Err(ValidationError::Version(-1)),
            ),
            (
                "size 0",
                Node { size: 0, ..leaf() },
                Err(ValidationError::LeafSize(0)),
            ),
            (
                "size 2",
                Node { size: 2, ..leaf() },
                Err(ValidationError::LeafSize(2)),
            ),
            (
                "size -1",
                Node { size: -1, ..leaf() },
                Err(ValidationError::LeafSize(-1)),
            ),
            (
                "left hash",
                Node { left: h(), ..leaf() },
                Err(ValidationError::LeafWithChildren),
            ),
            (
                "left child",
                Node { left: c(), ..leaf() },
                Err(ValidationError::LeafWithChildren),
            ),
            (
                "right hash",
                Node { right: h(), ..leaf() },
                Err(ValidationError::LeafWithChildren),
            ),
            (
                "right child",
                Node { right: c(), ..leaf() },
                Err(ValidationError::LeafWithChildren),
            ),
            (
                "empty left hash",
                Node {
                    left: Child::Unresolved(Hash::default()),
                    ..leaf()
                },
                Ok(()),
            ),
        ];

        for (desc, node, expected) in cases {
            assert_eq!(node.validate(), expected, "leaf with {desc}");
        }
    }

    #[test]
    fn test_inner_nodes() {
        let cases: Vec<(&str, Node, Result<(), ValidationError>)> = vec![
            ("both hashes", inner(h(), h()), Ok(())),
            ("both children", inner(c(), c()), Ok(())),
            (
                "nil key",
                Node {
                    key: None,
                    value: Some(V.to_vec()),
                    ..inner(h(), h())
                },
                Err(ValidationError::MissingKey),
            ),
            (
                "value",
                Node {
                    value: Some(V.to_vec()),
                    ..inner(h(), h())
                },
                Err(ValidationError::InnerWithValue),
            ),
            (
                "empty value",
                Node {
                    value: Some(vec![]),
                    ..inner(h(), h())
                },
                Err(ValidationError::InnerWithValue),
            ),
            ("left only", inner(h(), Child::Absent), Ok(())),
            ("right only", inner(Child::Absent, h()), Ok(())),
            ("left pointer only", inner(c(), Child::Absent), Ok(())),
            (
                "no child",
                inner(Child::Absent, Child::Absent),
                Err(ValidationError::InnerWithoutChildren),
            ),
            (
                "only an empty hash",
                inner(Child::Unresolved(Hash::default()), Child::Absent),
                Err(ValidationError::InnerWithoutChildren),
            ),
            (
                "empty hashes on both sides",
                inner(
                    Child::Unresolved(Hash::default()),
                    Child::Unresolved(Hash::default()),
                ),
                Err(ValidationError::InnerWithoutChildren),
            ),
            (
                "an empty hash beside a real one",
                inner(Child::Unresolved(Hash::default()), h()),
                Ok(()),
            ),
            (
                "height 0",
                Node {
                    height: 0,
                    ..inner(h(), h())
                },
                Err(ValidationError::LeafWithoutValue),
            ),
            (
                "negative height",
                Node {
                    height: -1,
                    ..inner(h(), h())
                },
                Err(ValidationError::NegativeHeight(-1)),
            ),
            (
                "version 0",
                Node {
                    version: 0,
                    ..inner(h(), h())
                },
                Err(ValidationError::Version(0)),
            ),
            (
                "size 0",
                Node {
                    size: 0,
                    ..inner(h(), h())
                },
                Err(ValidationError::Size(0)),
            ),
        ];

        for (desc, node, expected) in cases {
            assert_eq!(node.validate(), expected, "inner with {desc}");
        }
    }

    #[test]
    fn test_error_wraps_into_crate_error() {
        let error: Error = leaf_without_value().validate().unwrap_err().into();
        assert_eq!(error, Error::Invalid(ValidationError::LeafWithoutValue));
        assert_eq!(
            error.to_string(),
            "invalid node: value cannot be absent in leaf node"
        );
    }

    fn leaf_without_value() -> Node {
        Node { value: None, ..leaf() }
    }

    #[proptest(fork = false)]
    fn test_well_formed_nodes_pass(node: Node) {
        prop_assert_eq!(validate(Some(&node)), Ok(()));
    }

    #[proptest(fork = false)]
    fn test_any_child_makes_leaf_invalid(node: Node, hash: Hash) {
        prop_assume!(node.is_leaf());
        let node = Node {
            right: Child::Unresolved(hash),
            ..node
        };
        prop_assert_eq!(node.validate(), Err(ValidationError::LeafWithChildren));
    }
}
