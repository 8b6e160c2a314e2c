//! Bit-by-bit tree walk that recovers symbols from a code stream.

use tracing::trace;

use crate::error::{Error, Result};
use crate::tree::{HuffmanNode, HuffmanTree};

/// Decode `bits` against `tree`.
///
/// Starting at the root, `0` steps left and `1` steps right; reaching a leaf
/// emits its symbol and returns to the root. For a tree that is a single
/// leaf every bit stands for that leaf's symbol.
///
/// # Errors
/// `Error::TruncatedStream` if the bits run out partway down a code.
pub fn decode<I>(bits: I, tree: &HuffmanTree) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = bool>,
{
    let bits = bits.into_iter();

    let root_children = match tree[tree.root()] {
        HuffmanNode::Leaf { symbol, .. } => return Ok(bits.map(|_| symbol).collect()),
        HuffmanNode::Internal { left, right, .. } => (left, right),
    };

    let mut output = Vec::with_capacity(bits.size_hint().0 / 8);
    let (mut left, mut right) = root_children;
    // Internal levels below the root where the cursor currently rests.
    let mut depth = 0;
    let mut consumed = 0;

    for bit in bits {
        consumed += 1;
        match tree[if bit { right } else { left }] {
            HuffmanNode::Leaf { symbol, .. } => {
                output.push(symbol);
                (left, right) = root_children;
                depth = 0;
            }
            HuffmanNode::Internal {
                left: next_left,
                right: next_right,
                ..
            } => {
                (left, right) = (next_left, next_right);
                depth += 1;
            }
        }
    }

    if depth != 0 {
        trace!(consumed, depth, "bitstream ended mid-code");
        return Err(Error::TruncatedStream {
            bits: consumed,
            depth,
        });
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitio::BitString;
    use crate::frequency::analyze;
    use crate::tree::build;

    fn bits(s: &str) -> BitString {
        s.parse().unwrap()
    }

    #[test]
    fn test_decode_three_symbols() {
        // c = 0, a = 10, b = 11
        let tree = build(&analyze(b"abc")).unwrap();
        let decoded = decode(&bits("10110"), &tree).unwrap();
        assert_eq!(decoded, b"abc");
    }

    #[test]
    fn test_single_leaf_repeats_symbol() {
        let tree = build(&analyze(b"q")).unwrap();
        assert_eq!(decode(&bits("0000"), &tree).unwrap(), b"qqqq");
        assert!(decode(&BitString::new(), &tree).unwrap().is_empty());
    }

    #[test]
    fn test_empty_stream_decodes_to_nothing() {
        let tree = build(&analyze(b"abc")).unwrap();
        assert!(decode(&BitString::new(), &tree).unwrap().is_empty());
    }

    #[test]
    fn test_truncated_stream() {
        let tree = build(&analyze(b"abc")).unwrap();
        let result = decode(&bits("101"), &tree);
        assert!(matches!(
            result,
            Err(Error::TruncatedStream { bits: 3, depth: 1 })
        ));
    }
}
