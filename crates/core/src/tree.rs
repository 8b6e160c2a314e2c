//! Huffman tree arena and the minimum-weight merge builder.
//!
//! Nodes live in a flat `Vec` and refer to their children by index. The
//! root is always the last node pushed, but callers should go through
//! [`HuffmanTree::root`] rather than rely on that.
//!
//! # Tie-break
//!
//! Nodes are ordered in the working heap by `(weight, sequence)`. Leaves get
//! sequence numbers in frequency-table order, and each merged node gets the
//! next number, which here is simply its arena index. Equal weights therefore
//! resolve first-inserted-first, and a freshly merged node ranks after every
//! older node of the same weight. The first node popped becomes the left
//! child.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::ops::Index;

use tracing::trace;

use crate::error::{Error, Result, TreeError};
use crate::frequency::FrequencyTable;

/// Index of a node inside a [`HuffmanTree`] arena.
pub type NodeId = usize;

/// A node of the prefix tree.
///
/// `weight` is always the sum of the descendant leaf weights. Internal nodes
/// always have exactly two children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HuffmanNode {
    Leaf {
        symbol: u8,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: NodeId,
        right: NodeId,
    },
}

impl HuffmanNode {
    pub fn weight(&self) -> u64 {
        match self {
            HuffmanNode::Leaf { weight, .. } | HuffmanNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffmanNode::Leaf { .. })
    }
}

/// Immutable Huffman tree for one encode or decode session.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<HuffmanNode>,
    root: NodeId,
}

impl HuffmanTree {
    /// Assemble a tree from an arena whose children precede their parents.
    ///
    /// # Errors
    /// `TreeError::DanglingNode` if the root or any child index is out of range.
    pub(crate) fn from_arena(nodes: Vec<HuffmanNode>, root: NodeId) -> Result<Self> {
        let len = nodes.len();
        let check = |index: NodeId| {
            if index < len {
                Ok(())
            } else {
                Err(TreeError::DanglingNode { index, len })
            }
        };

        check(root)?;
        for node in &nodes {
            if let HuffmanNode::Internal { left, right, .. } = *node {
                check(left)?;
                check(right)?;
            }
        }

        Ok(Self { nodes, root })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node by index.
    ///
    /// # Errors
    /// `TreeError::DanglingNode` if `id` is not in the arena.
    pub fn node(&self, id: NodeId) -> Result<&HuffmanNode> {
        self.nodes.get(id).ok_or_else(|| {
            TreeError::DanglingNode {
                index: id,
                len: self.nodes.len(),
            }
            .into()
        })
    }

    pub fn root_node(&self) -> &HuffmanNode {
        &self.nodes[self.root]
    }

    /// Total number of nodes, leaves and internal.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// True when the whole tree is one leaf (a single distinct symbol).
    pub fn is_single_leaf(&self) -> bool {
        self.root_node().is_leaf()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Weight of the root, i.e. the number of encoded symbols.
    pub fn weight(&self) -> u64 {
        self.root_node().weight()
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self.root, 0usize)];

        while let Some((id, depth)) = stack.pop() {
            match self.nodes[id] {
                HuffmanNode::Leaf { .. } => max_depth = max_depth.max(depth),
                HuffmanNode::Internal { left, right, .. } => {
                    stack.push((right, depth + 1));
                    stack.push((left, depth + 1));
                }
            }
        }

        max_depth
    }
}

impl Index<NodeId> for HuffmanTree {
    type Output = HuffmanNode;

    /// Child indices read from this tree's own nodes are always in range.
    fn index(&self, id: NodeId) -> &HuffmanNode {
        &self.nodes[id]
    }
}

impl PartialEq for HuffmanTree {
    /// Structural equality: same shape, same symbols in the same positions,
    /// same weights. Arena layout is irrelevant.
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self.root, other.root)];

        while let Some((a, b)) = stack.pop() {
            match (self.nodes[a], other.nodes[b]) {
                (
                    HuffmanNode::Leaf { symbol: sa, weight: wa },
                    HuffmanNode::Leaf { symbol: sb, weight: wb },
                ) => {
                    if sa != sb || wa != wb {
                        return false;
                    }
                }
                (
                    HuffmanNode::Internal { weight: wa, left: la, right: ra },
                    HuffmanNode::Internal { weight: wb, left: lb, right: rb },
                ) => {
                    if wa != wb {
                        return false;
                    }
                    stack.push((ra, rb));
                    stack.push((la, lb));
                }
                _ => return false,
            }
        }

        true
    }
}

impl Eq for HuffmanTree {}

/// Build a Huffman tree by repeatedly merging the two lightest nodes.
///
/// A table with a single symbol yields a tree that is one leaf.
///
/// # Errors
/// `Error::InvalidInput` if `freq` is empty or its counts sum past `u64::MAX`.
pub fn build(freq: &FrequencyTable) -> Result<HuffmanTree> {
    if freq.is_empty() {
        return Err(Error::InvalidInput(
            "cannot build a tree from an empty frequency table".to_string(),
        ));
    }

    let mut nodes = Vec::with_capacity(2 * freq.len() - 1);
    let mut heap = BinaryHeap::with_capacity(freq.len());

    for (symbol, weight) in freq.iter() {
        let id = nodes.len();
        nodes.push(HuffmanNode::Leaf { symbol, weight });
        heap.push(Reverse((weight, id)));
    }

    let root = loop {
        let Reverse((left_weight, left)) = heap
            .pop()
            .ok_or_else(|| Error::InvalidInput("tree builder ran out of nodes".to_string()))?;

        let Some(Reverse((right_weight, right))) = heap.pop() else {
            break left;
        };

        let weight = left_weight.checked_add(right_weight).ok_or_else(|| {
            Error::InvalidInput(format!(
                "node weights {left_weight} and {right_weight} overflow u64"
            ))
        })?;
        let id = nodes.len();
        trace!(left, right, weight, id, "merged nodes");
        nodes.push(HuffmanNode::Internal { weight, left, right });
        heap.push(Reverse((weight, id)));
    };

    HuffmanTree::from_arena(nodes, root)
}
