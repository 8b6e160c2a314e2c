//! Symbol frequency analysis.
//!
//! The table remembers the order in which symbols were first seen. Tree
//! construction breaks weight ties by that order, so two tables built from
//! the same input always produce the same tree.

use crate::error::{Error, Result};

/// Mapping from byte symbol to a positive occurrence count.
///
/// # Invariants
/// - every count is at least 1
/// - each symbol appears once, in first-occurrence order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrequencyTable {
    entries: Vec<(u8, u64)>,
}

impl FrequencyTable {
    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count for `symbol`, or `None` if it never occurred.
    pub fn get(&self, symbol: u8) -> Option<u64> {
        self.entries
            .iter()
            .find(|(s, _)| *s == symbol)
            .map(|&(_, count)| count)
    }

    /// Iterate `(symbol, count)` pairs in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.entries.iter().copied()
    }

    /// Sum of all counts (the input length), saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |sum, &(_, count)| sum.saturating_add(count))
    }

    /// Build a table from explicit pairs, rejecting counts that cannot be
    /// weighed together.
    ///
    /// Repeated symbols are merged and zero counts dropped, as with
    /// `collect()`.
    ///
    /// # Errors
    /// `Error::InvalidInput` if the counts sum past `u64::MAX`, since every
    /// tree weight must fit in a `u64`.
    pub fn try_from_pairs<I: IntoIterator<Item = (u8, u64)>>(pairs: I) -> Result<Self> {
        let mut total = 0u64;
        let mut merged = Vec::new();
        for (symbol, count) in pairs {
            total = total.checked_add(count).ok_or_else(|| {
                Error::InvalidInput(format!("frequency counts overflow u64 at symbol {symbol}"))
            })?;
            merged.push((symbol, count));
        }
        Ok(merged.into_iter().collect())
    }
}

impl FromIterator<(u8, u64)> for FrequencyTable {
    /// Build a table from explicit pairs, merging repeated symbols and
    /// dropping zero counts. Order of first appearance is kept.
    ///
    /// Merged counts saturate at `u64::MAX`; use
    /// [`FrequencyTable::try_from_pairs`] to reject them instead.
    fn from_iter<I: IntoIterator<Item = (u8, u64)>>(iter: I) -> Self {
        let mut slots: [Option<usize>; 256] = [None; 256];
        let mut entries: Vec<(u8, u64)> = Vec::new();

        for (symbol, count) in iter {
            if count == 0 {
                continue;
            }
            match slots[symbol as usize] {
                Some(idx) => entries[idx].1 = entries[idx].1.saturating_add(count),
                None => {
                    slots[symbol as usize] = Some(entries.len());
                    entries.push((symbol, count));
                }
            }
        }

        Self { entries }
    }
}

/// Count every symbol of `input` in a single pass.
///
/// Returns an empty table for empty input; encoding treats that as the
/// empty-input boundary.
pub fn analyze(input: &[u8]) -> FrequencyTable {
    input.iter().map(|&byte| (byte, 1)).collect()
}
