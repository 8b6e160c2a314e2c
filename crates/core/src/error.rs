//! Error types for the huffpack codec.
//!
//! Every codec operation returns a structured error instead of panicking.
//! An error is terminal for the encode or decode call that raised it: no
//! partially decoded output is ever returned alongside one.

use thiserror::Error;

/// Top-level error type for all codec operations.
///
/// The first five variants are the codec's error kinds:
/// - `EmptyInput`: nothing to encode
/// - `InvalidInput`: missing tree, empty frequency table, unknown symbol
/// - `InvalidPadding`: padding count that cannot describe the packed bytes
/// - `MalformedTree`: structural violation in a tree or tree artifact
/// - `TruncatedStream`: bitstream ended in the middle of a code
#[derive(Debug, Error)]
pub enum Error {
    /// Encode was called with zero symbols.
    ///
    /// Callers treat this as "no artifacts", not as a failure to report.
    #[error("empty input: nothing to encode")]
    EmptyInput,

    /// A required input was missing or unusable.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Padding outside `[0, 7]` or larger than the number of available bits
    #[error("invalid padding {padding}: must be 0-7 and at most {available} bits")]
    InvalidPadding { padding: usize, available: usize },

    /// Tree or tree artifact violates the strict binary tree shape
    #[error("malformed tree: {0}")]
    MalformedTree(#[from] TreeError),

    /// Decoding consumed every bit but stopped partway down a code path
    #[error("truncated stream: {bits} bits consumed, ended {depth} levels below the root")]
    TruncatedStream { bits: usize, depth: usize },

    /// Persisted bitstream header is invalid
    #[error("framing error: {0}")]
    Framing(#[from] FramingError),
}

impl Error {
    /// True for the empty-input boundary, which produces no artifacts.
    pub fn is_empty_input(&self) -> bool {
        matches!(self, Error::EmptyInput)
    }
}

/// Structural problems found in a tree or its serialized artifact.
#[derive(Debug, Error)]
pub enum TreeError {
    /// Artifact text is not valid JSON or does not match the record shape
    #[error("invalid tree artifact: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal record with only one child
    #[error("node has a {present} child but no {missing} child")]
    MissingChild {
        present: &'static str,
        missing: &'static str,
    },

    /// Record with no children and no symbol
    #[error("leaf record has no symbol")]
    LeafWithoutSymbol,

    /// Record with children that also carries a symbol
    #[error("internal record carries symbol {0}")]
    InternalWithSymbol(u8),

    /// Leaf weight of zero (every symbol occurs at least once)
    #[error("leaf for symbol {0} has zero weight")]
    ZeroWeight(u8),

    /// Internal weight differs from the sum of its children
    #[error("internal weight {actual} does not equal child sum {expected}")]
    WeightMismatch { expected: u64, actual: u64 },

    /// Same symbol found at two leaves
    #[error("symbol {0} appears at more than one leaf")]
    DuplicateSymbol(u8),

    /// Tree nests deeper than the artifact format can carry
    #[error("tree depth {depth} exceeds the artifact limit of {max}")]
    TooDeep { depth: usize, max: usize },

    /// Child index that does not name a node in the arena
    #[error("node index {index} out of range for {len} nodes")]
    DanglingNode { index: usize, len: usize },
}

/// Persisted bitstream header errors.
#[derive(Debug, Error)]
pub enum FramingError {
    /// Invalid magic number in header
    #[error("invalid magic number: expected {expected:?}, got {actual:?}")]
    InvalidMagic { expected: [u8; 4], actual: [u8; 4] },

    /// Buffer is too short to contain a valid header
    #[error("bitstream too short: need at least {required} bytes, got {actual}")]
    TooShort { required: usize, actual: usize },

    /// Payload length doesn't match the header
    #[error("payload length mismatch: header says {expected}, got {actual}")]
    PayloadLengthMismatch { expected: usize, actual: usize },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
