//! Tree artifact: a self-describing, human-readable form of a Huffman tree.
//!
//! Each node becomes a record mirroring the tree structure:
//!
//! ```json
//! {"symbol": null, "weight": 3,
//!  "left":  {"symbol": 99, "weight": 1, "left": null, "right": null},
//!  "right": {"symbol": null, "weight": 2, "left": {...}, "right": {...}}}
//! ```
//!
//! Symbols are stored as integers 0-255 so control and non-printable bytes
//! survive unchanged. Leaves have both children null; internal records have
//! both present and a null symbol. A missing tree serializes as `null`.
//!
//! The artifact carries no reference to any bitstream, and reconstruction
//! validates the full shape: one-child records, weight sums, duplicate
//! symbols and zero-weight leaves are all rejected as malformed.
//!
//! # Depth limit
//!
//! The JSON parser accepts at most 127 nested objects, so an artifact holds
//! trees up to [`MAX_DEPTH`] levels deep. [`TreeArtifact::to_json`] refuses
//! anything deeper rather than write text that cannot be read back. Trees
//! built from byte counts stay well inside the limit, since depth `d` needs
//! more than `Fib(d + 1)` symbols.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, TreeError};
use crate::tree::{HuffmanNode, HuffmanTree, NodeId};

/// Deepest root-to-leaf path an artifact can carry.
pub const MAX_DEPTH: usize = 126;

/// One node of the serialized tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TreeRecord {
    pub symbol: Option<u8>,
    pub weight: u64,
    pub left: Option<Box<TreeRecord>>,
    pub right: Option<Box<TreeRecord>>,
}

impl TreeRecord {
    pub fn leaf(symbol: u8, weight: u64) -> Self {
        Self {
            symbol: Some(symbol),
            weight,
            left: None,
            right: None,
        }
    }

    pub fn internal(weight: u64, left: TreeRecord, right: TreeRecord) -> Self {
        Self {
            symbol: None,
            weight,
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
        }
    }
}

/// Serialized tree, or the absence of one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreeArtifact {
    root: Option<TreeRecord>,
}

impl TreeArtifact {
    pub fn new(root: TreeRecord) -> Self {
        Self { root: Some(root) }
    }

    /// Artifact standing for "no tree" (the JSON literal `null`).
    pub fn missing() -> Self {
        Self { root: None }
    }

    pub fn root(&self) -> Option<&TreeRecord> {
        self.root.as_ref()
    }

    pub fn is_missing(&self) -> bool {
        self.root.is_none()
    }

    /// Length of the longest root-to-leaf path, 0 for a leaf or no tree.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(&TreeRecord, usize)> = self.root.iter().map(|r| (r, 0)).collect();

        while let Some((record, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            for child in [&record.left, &record.right].into_iter().flatten() {
                stack.push((&**child, depth + 1));
            }
        }

        max_depth
    }

    /// Compact JSON text.
    ///
    /// # Errors
    /// `TreeError::TooDeep` if the tree is deeper than [`MAX_DEPTH`].
    pub fn to_json(&self) -> Result<String> {
        self.check_depth()?;
        serde_json::to_string(self).map_err(|e| TreeError::Json(e).into())
    }

    /// Indented JSON text, for files meant to be read by people.
    pub fn to_json_pretty(&self) -> Result<String> {
        self.check_depth()?;
        serde_json::to_string_pretty(self).map_err(|e| TreeError::Json(e).into())
    }

    fn check_depth(&self) -> Result<()> {
        let depth = self.depth();
        if depth > MAX_DEPTH {
            return Err(TreeError::TooDeep { depth, max: MAX_DEPTH }.into());
        }
        Ok(())
    }

    /// Parse JSON text.
    ///
    /// # Errors
    /// `Error::MalformedTree` if the text is not JSON or not a record tree.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| TreeError::Json(e).into())
    }
}

/// Mirror `tree` into a record tree.
pub fn serialize(tree: &HuffmanTree) -> TreeArtifact {
    TreeArtifact::new(record(tree, tree.root()))
}

fn record(tree: &HuffmanTree, id: NodeId) -> TreeRecord {
    match tree[id] {
        HuffmanNode::Leaf { symbol, weight } => TreeRecord::leaf(symbol, weight),
        HuffmanNode::Internal { weight, left, right } => {
            TreeRecord::internal(weight, record(tree, left), record(tree, right))
        }
    }
}

/// Rebuild a tree from its artifact.
///
/// # Errors
/// - `Error::InvalidInput` if the artifact is the missing tree
/// - `Error::MalformedTree` on any structural violation
pub fn deserialize(artifact: &TreeArtifact) -> Result<HuffmanTree> {
    let root = artifact
        .root()
        .ok_or_else(|| Error::InvalidInput("tree artifact is null".to_string()))?;

    let mut nodes = Vec::new();
    let mut seen = [false; 256];
    let root_id = lower(root, &mut nodes, &mut seen)?;

    HuffmanTree::from_arena(nodes, root_id)
}

/// Push `record`'s subtree into `nodes` children-first and return its index.
fn lower(
    record: &TreeRecord,
    nodes: &mut Vec<HuffmanNode>,
    seen: &mut [bool; 256],
) -> Result<NodeId> {
    let node = match (&record.left, &record.right) {
        (None, None) => {
            let symbol = record.symbol.ok_or(TreeError::LeafWithoutSymbol)?;
            if record.weight == 0 {
                return Err(TreeError::ZeroWeight(symbol).into());
            }
            if std::mem::replace(&mut seen[symbol as usize], true) {
                return Err(TreeError::DuplicateSymbol(symbol).into());
            }
            HuffmanNode::Leaf {
                symbol,
                weight: record.weight,
            }
        }
        (Some(left), Some(right)) => {
            if let Some(symbol) = record.symbol {
                return Err(TreeError::InternalWithSymbol(symbol).into());
            }
            let left = lower(left, nodes, seen)?;
            let right = lower(right, nodes, seen)?;

            let expected = nodes[left].weight().checked_add(nodes[right].weight());
            if expected != Some(record.weight) {
                return Err(TreeError::WeightMismatch {
                    expected: expected.unwrap_or(u64::MAX),
                    actual: record.weight,
                }
                .into());
            }
            HuffmanNode::Internal {
                weight: record.weight,
                left,
                right,
            }
        }
        (Some(_), None) => {
            return Err(TreeError::MissingChild {
                present: "left",
                missing: "right",
            }
            .into())
        }
        (None, Some(_)) => {
            return Err(TreeError::MissingChild {
                present: "right",
                missing: "left",
            }
            .into())
        }
    };

    nodes.push(node);
    Ok(nodes.len() - 1)
}
