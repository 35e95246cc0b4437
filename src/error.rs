use thiserror::Error as ThisError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The first structural invariant a node was found to violate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum ValidationError {
    #[error("node cannot be absent")]
    AbsentNode,

    #[error("key cannot be absent")]
    MissingKey,

    #[error("height must not be negative, got {0}")]
    NegativeHeight(i8),

    #[error("value cannot be absent in leaf node")]
    LeafWithoutValue,

    #[error("size must be 1 in leaf node, got {0}")]
    LeafSize(i64),

    #[error("leaf node cannot have children")]
    LeafWithChildren,

    #[error("value must be absent in inner node")]
    InnerWithValue,

    #[error("inner node must have at least one child")]
    InnerWithoutChildren,

    #[error("version must be at least 1, got {0}")]
    Version(i64),

    #[error("size must be at least 1, got {0}")]
    Size(i64),
}

#[derive(Debug, ThisError, PartialEq, Eq, Clone)]
pub enum Error {
    #[error("cannot serialize an absent node")]
    AbsentNode,

    #[error("unexpected end of input while reading {field}")]
    Truncated { field: &'static str },

    #[error("{field} declares {declared} bytes but only {remaining} remain")]
    LengthMismatch {
        field: &'static str,
        declared: u64,
        remaining: usize,
    },

    #[error("{0} trailing bytes after the last node field")]
    TrailingBytes(usize),

    #[error("failed to deserialize: {0}")]
    FailedDeserialization(String),

    #[error("invalid node: {0}")]
    Invalid(#[from] ValidationError),
}

impl From<hex::FromHexError> for Error {
    #[cfg_attr(coverage_nightly, coverage(off))]
    fn from(error: hex::FromHexError) -> Self {
        Error::FailedDeserialization(format!("{}", error))
    }
}

