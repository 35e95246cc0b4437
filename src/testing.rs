use proptest::{
    collection::vec,
    option,
    prelude::*,
    strategy::ValueTree,
    test_runner::{Config as TestConfig, TestRunner},
};

use crate::prelude::*;

pub fn bytes(max: usize) -> impl Strategy<Value = Vec<u8>> {
    vec(any::<u8>(), 0..=max)
}

/// A well-formed leaf, in the form a decoder produces it.
pub fn leaf() -> impl Strategy<Value = Node> {
    (bytes(64), bytes(256), 1..=i64::MAX)
        .prop_map(|(key, value, version)| Node::leaf(key, value, version))
}

/// A reference to one side of an inner node, as persisted.
pub fn side() -> impl Strategy<Value = Child> {
    prop_oneof![
        1 => Just(Child::Absent),
        4 => any::<Hash>().prop_map(Child::Unresolved),
    ]
}

/// A well-formed inner node, in the form a decoder produces it.
pub fn inner() -> impl Strategy<Value = Node> {
    (
        bytes(64),
        1..=i8::MAX,
        1..=i64::MAX,
        1..=i64::MAX,
        side(),
        side(),
    )
        .prop_filter("inner nodes need a child", |(.., left, right)| {
            left.is_present() || right.is_present()
        })
        .prop_map(|(key, height, size, version, left, right)| {
            Node::inner(key, height, size, version, left, right)
        })
}

pub fn node() -> impl Strategy<Value = Node> {
    prop_oneof![leaf(), inner()]
}

/// Any node the codec can be asked to write, well-formed or not, including runtime-only state.
pub fn any_shape() -> impl Strategy<Value = Node> {
    (
        (
            option::of(bytes(300)),
            option::of(bytes(300)),
            any::<i8>(),
            any::<i64>(),
            any::<i64>(),
        ),
        (option::of(any::<Hash>()), any_child(), any_child(), any::<bool>()),
    )
        .prop_map(
            |((key, value, height, size, version), (hash, left, right, persisted))| Node {
                key,
                value,
                height,
                size,
                version,
                hash,
                left,
                right,
                persisted,
            },
        )
}

fn any_child() -> impl Strategy<Value = Child> {
    prop_oneof![
        side(),
        (option::of(any::<Hash>()), leaf()).prop_map(|(hash, node)| Child::Resolved {
            hash,
            node: Box::new(node),
        }),
    ]
}

/// Draws a single value from `strategy`, for use outside of property tests.
pub fn unwrap_strategy<T: std::fmt::Debug>(strategy: impl Strategy<Value = T>) -> T {
    let mut test_runner = TestRunner::new(TestConfig::default());

    strategy
        .new_tree(&mut test_runner)
        .expect("Failed to get new value from strategy")
        .current()
}
