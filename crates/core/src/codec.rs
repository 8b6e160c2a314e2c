//! End-to-end encode and decode pipelines.
//!
//! Encode: analyze frequencies, build the tree, generate codes, pack the
//! code stream, and serialize the tree alongside. Decode: rebuild the tree
//! from its artifact, unpack the bitstream, and walk the tree.
//!
//! The two artifacts are independent of each other, and both are needed to
//! decode. Pairing a tree with a bitstream from another session is not
//! detected and yields garbage or a `TruncatedStream` error.

use tracing::debug;

use crate::artifact::{parse_bitstream, serialize_bitstream};
use crate::bitio::{BitString, BitWriter, PackedBitstream};
use crate::code_table::{self, CodeTable};
use crate::decoder;
use crate::error::{Error, Result};
use crate::frequency::{self, FrequencyTable};
use crate::tree::{self, HuffmanTree};
use crate::tree_codec::{self, TreeArtifact};

/// Everything produced by one encode session.
#[derive(Debug, Clone)]
pub struct Encoded {
    pub frequencies: FrequencyTable,
    pub tree: HuffmanTree,
    pub codes: CodeTable,
    /// First artifact: packed code bits with their padding count
    pub bitstream: PackedBitstream,
    /// Second artifact: the serialized tree
    pub tree_artifact: TreeArtifact,
}

impl Encoded {
    /// Persisted bitstream bytes (with header).
    pub fn bitstream_bytes(&self) -> Result<Vec<u8>> {
        serialize_bitstream(&self.bitstream)
    }

    /// Tree artifact as indented JSON.
    pub fn tree_json(&self) -> Result<String> {
        self.tree_artifact.to_json_pretty()
    }
}

/// Encode `input` into a packed bitstream and a tree artifact.
///
/// # Errors
/// `Error::EmptyInput` if `input` is empty; no artifacts exist in that case.
pub fn encode(input: &[u8]) -> Result<Encoded> {
    if input.is_empty() {
        return Err(Error::EmptyInput);
    }

    let frequencies = frequency::analyze(input);
    let tree = tree::build(&frequencies)?;
    let codes = code_table::generate(&tree)?;

    let mut writer = BitWriter::with_capacity(codes.encoded_bit_len(&frequencies) as usize);
    for &symbol in input {
        writer.write_code(lookup(&codes, symbol)?);
    }
    let bitstream = writer.finish();
    let tree_artifact = tree_codec::serialize(&tree);

    debug!(
        input_bytes = input.len(),
        distinct_symbols = frequencies.len(),
        tree_depth = tree.depth(),
        code_bits = bitstream.bit_len(),
        padding = bitstream.padding(),
        "encoded input"
    );

    Ok(Encoded {
        frequencies,
        tree,
        codes,
        bitstream,
        tree_artifact,
    })
}

/// Concatenate the codes of every symbol of `input`, in input order.
///
/// # Errors
/// `Error::InvalidInput` if a symbol has no code in `codes`.
pub fn encode_bits(input: &[u8], codes: &CodeTable) -> Result<BitString> {
    let mut bits = BitString::new();
    for &symbol in input {
        bits.extend_from(lookup(codes, symbol)?);
    }
    Ok(bits)
}

fn lookup(codes: &CodeTable, symbol: u8) -> Result<&BitString> {
    codes
        .get(symbol)
        .ok_or_else(|| Error::InvalidInput(format!("symbol {symbol:#04x} has no code")))
}

/// Decode an in-memory bitstream with its tree artifact.
///
/// # Errors
/// - `Error::InvalidInput` if the artifact is the missing tree
/// - `Error::MalformedTree` if the artifact does not describe a valid tree
/// - `Error::TruncatedStream` if the bits end mid-code
pub fn decode(bitstream: &PackedBitstream, tree_artifact: &TreeArtifact) -> Result<Vec<u8>> {
    let tree = tree_codec::deserialize(tree_artifact)?;
    let output = decoder::decode(bitstream.reader(), &tree)?;

    debug!(
        code_bits = bitstream.bit_len(),
        output_bytes = output.len(),
        "decoded bitstream"
    );

    Ok(output)
}

/// Decode the two persisted artifacts: bitstream file bytes and tree JSON.
///
/// # Errors
/// Everything [`decode`] reports, plus framing and padding errors from the
/// bitstream header and `Error::MalformedTree` for unparsable JSON.
pub fn decode_persisted(bitstream: &[u8], tree_json: &str) -> Result<Vec<u8>> {
    let tree_artifact = TreeArtifact::from_json(tree_json)?;
    let bitstream = parse_bitstream(bitstream)?;
    decode(&bitstream, &tree_artifact)
}
