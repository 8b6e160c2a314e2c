//! Code table generation from a Huffman tree.
//!
//! Descending left appends `0`, descending right appends `1`. The table is
//! prefix-free because every code is a distinct root-to-leaf path. A tree
//! that is a single leaf gets the one-bit code `0`, so every symbol always
//! costs at least one bit.

use std::collections::BTreeMap;

use crate::bitio::BitString;
use crate::error::Result;
use crate::frequency::FrequencyTable;
use crate::tree::{HuffmanNode, HuffmanTree};

/// Mapping from symbol to its non-empty code, ordered by symbol.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodeTable {
    codes: BTreeMap<u8, BitString>,
}

impl CodeTable {
    pub fn get(&self, symbol: u8) -> Option<&BitString> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &BitString)> + '_ {
        self.codes.iter().map(|(&symbol, code)| (symbol, code))
    }

    /// Check that no code is a prefix of another.
    ///
    /// Sorting the codes lexicographically puts any prefix directly before
    /// some code it prefixes, so comparing neighbors is enough.
    pub fn is_prefix_free(&self) -> bool {
        let mut codes: Vec<&[bool]> = self.codes.values().map(BitString::as_slice).collect();
        codes.sort_unstable();
        codes.windows(2).all(|pair| !pair[1].starts_with(pair[0]))
    }

    /// Length of the longest code.
    pub fn max_code_len(&self) -> usize {
        self.codes.values().map(BitString::len).max().unwrap_or(0)
    }

    /// Number of bits needed to encode an input with these frequencies.
    ///
    /// Symbols in `freq` that have no code are ignored. Saturates at
    /// `u64::MAX`.
    pub fn encoded_bit_len(&self, freq: &FrequencyTable) -> u64 {
        freq.iter()
            .filter_map(|(symbol, count)| {
                self.get(symbol)
                    .map(|code| (code.len() as u64).saturating_mul(count))
            })
            .fold(0u64, u64::saturating_add)
    }
}

/// Walk `tree` and record the path to every leaf.
///
/// # Errors
/// `Error::MalformedTree` if a child index does not resolve to a node.
pub fn generate(tree: &HuffmanTree) -> Result<CodeTable> {
    let mut codes = BTreeMap::new();

    if let HuffmanNode::Leaf { symbol, .. } = *tree.root_node() {
        codes.insert(symbol, BitString::from(vec![false]));
        return Ok(CodeTable { codes });
    }

    let mut stack = vec![(tree.root(), BitString::new())];

    while let Some((id, prefix)) = stack.pop() {
        match *tree.node(id)? {
            HuffmanNode::Leaf { symbol, .. } => {
                codes.insert(symbol, prefix);
            }
            HuffmanNode::Internal { left, right, .. } => {
                let mut right_code = prefix.clone();
                right_code.push(true);
                let mut left_code = prefix;
                left_code.push(false);

                stack.push((right, right_code));
                stack.push((left, left_code));
            }
        }
    }

    Ok(CodeTable { codes })
}
