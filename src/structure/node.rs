//! node.rs
//! Collapsible row ranges of a tree-shaped grid.

/// An inclusive row range `[start, end]` plus the sub-trees inside it.
///
/// A client collapses a sub-tree by hiding the contiguous rows
/// `start + 1 ..= end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsNode {
    pub start: usize,
    pub end: usize,
    pub children: Vec<AnalyticsNode>,
}

impl AnalyticsNode {
    pub fn new(start: usize, end: usize, children: Vec<AnalyticsNode>) -> Self {
        Self { start, end, children }
    }
}
