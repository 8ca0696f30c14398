//! Aggregated size tree.
//!
//! Every recorded entry adds its size to each node on the path from the root
//! down to the entry, so a node's total always equals the sum of its
//! children's totals, at every step of the walk.

use std::collections::BTreeMap;

/// One node of the aggregated tree.
///
/// Leaves are files (or directories folded at the depth cutoff); inner nodes
/// are directories whose total is the sum of their children.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SizeNode {
    /// Sum of all file sizes under this node
    pub total_bytes: u64,

    /// Children keyed by path segment
    pub children: BTreeMap<String, Self>,
}

impl SizeNode {
    /// Whether this node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Look up a descendant by its relative path segments.
    #[must_use]
    pub fn get<S: AsRef<str>>(&self, segments: &[S]) -> Option<&Self> {
        segments
            .iter()
            .try_fold(self, |node, segment| node.children.get(segment.as_ref()))
    }

    /// Check that every inner node's total equals the sum of its children.
    #[must_use]
    pub fn totals_consistent(&self) -> bool {
        if self.is_leaf() {
            return true;
        }

        let sum = self
            .children
            .values()
            .try_fold(0u64, |acc, child| acc.checked_add(child.total_bytes));

        sum == Some(self.total_bytes) && self.children.values().all(Self::totals_consistent)
    }
}

/// Write-once accumulator of sizes keyed by path.
#[derive(Debug, Default)]
pub struct SizeTree {
    root: SizeNode,
}

impl SizeTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `size` to the root and to every node along `segments`.
    ///
    /// Intermediate nodes are created on first reference. An empty
    /// `segments` slice adds to the root only. Totals saturate at `u64::MAX`.
    pub fn record<S: AsRef<str>>(&mut self, segments: &[S], size: u64) {
        let mut node = &mut self.root;
        node.total_bytes = node.total_bytes.saturating_add(size);

        for segment in segments {
            node = node
                .children
                .entry(segment.as_ref().to_string())
                .or_default();
            node.total_bytes = node.total_bytes.saturating_add(size);
        }
    }

    /// Borrow the root node.
    #[must_use]
    pub const fn root(&self) -> &SizeNode {
        &self.root
    }

    /// Grand total of everything recorded.
    #[must_use]
    pub const fn total_bytes(&self) -> u64 {
        self.root.total_bytes
    }

    /// Consume the tree, returning its root node.
    #[must_use]
    pub fn into_root(self) -> SizeNode {
        self.root
    }
}
