//! huffpack-core: classical Huffman codec with two independent artifacts
//!
//! Encoding turns a byte sequence into:
//! - a packed bitstream (MSB-first code bits plus the padding count), and
//! - a tree artifact (self-describing JSON record tree).
//!
//! Decoding needs both artifacts from the same session and reverses the
//! process exactly.
//!
//! # Architecture
//!
//! Modules, leaf-first:
//! - `frequency`: symbol counting in first-occurrence order
//! - `tree`: arena-backed Huffman tree and the min-heap builder
//! - `code_table`: root-to-leaf code generation
//! - `bitio`: bit strings, MSB-first packing and unpacking
//! - `tree_codec`: tree artifact serialization
//! - `decoder`: tree walk over a bit sequence
//! - `artifact`: persisted bitstream header
//! - `codec`: the encode and decode pipelines
//! - `metrics`: sizes, ratios and timing for a run
//!
//! # Example
//!
//! ```
//! use huffpack_core::codec;
//!
//! let encoded = codec::encode(b"abracadabra").unwrap();
//! let decoded = codec::decode(&encoded.bitstream, &encoded.tree_artifact).unwrap();
//! assert_eq!(decoded, b"abracadabra");
//! ```
//!
//! # Design Principles
//!
//! - **No panics**: every failure is a structured [`Error`]
//! - **Deterministic**: equal inputs give bit-identical trees and codes
//! - **Read-only trees**: a tree is never mutated once built

pub mod artifact;
pub mod bitio;
pub mod code_table;
pub mod codec;
pub mod decoder;
pub mod error;
pub mod frequency;
pub mod metrics;
pub mod tree;
pub mod tree_codec;

// Re-export commonly used types
pub use bitio::{BitString, PackedBitstream};
pub use code_table::CodeTable;
pub use codec::{decode, decode_persisted, encode, Encoded};
pub use error::{Error, Result};
pub use frequency::FrequencyTable;
pub use tree::{HuffmanNode, HuffmanTree};
pub use tree_codec::{TreeArtifact, TreeRecord};
