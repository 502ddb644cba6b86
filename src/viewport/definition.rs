//! definition.rs
//! The window a client asks to see: row and column subsets plus a format flag.

/// Ordered, de-duplicated row and column indices.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewportDefinition {
    rows: Vec<usize>,
    columns: Vec<usize>,
    expanded: bool,
}

impl ViewportDefinition {
    pub fn new(rows: impl IntoIterator<Item = usize>, columns: impl IntoIterator<Item = usize>, expanded: bool) -> Self {
        Self { rows: normalize(rows), columns: normalize(columns), expanded }
    }

    /// Every row and column of a `rows` x `columns` grid.
    pub fn full(rows: usize, columns: usize) -> Self {
        Self::new(0..rows, 0..columns, false)
    }

    pub fn rows(&self) -> &[usize] { &self.rows }

    pub fn columns(&self) -> &[usize] { &self.columns }

    pub fn is_expanded(&self) -> bool { self.expanded }

    /// Drops every index outside `row_count` x `column_count`.
    pub fn clipped(&self, row_count: usize, column_count: usize) -> Self {
        Self {
            rows: self.rows.iter().copied().filter(|&r| r < row_count).collect(),
            columns: self.columns.iter().copied().filter(|&c| c < column_count).collect(),
            expanded: self.expanded,
        }
    }
}

fn normalize(indices: impl IntoIterator<Item = usize>) -> Vec<usize> {
    let mut v: Vec<usize> = indices.into_iter().collect();
    v.sort_unstable();
    v.dedup();
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_are_sorted_and_unique() {
        let def = ViewportDefinition::new(vec![3, 1, 3, 0], vec![2, 2, 0], true);
        assert_eq!(def.rows(), &[0, 1, 3]);
        assert_eq!(def.columns(), &[0, 2]);
        assert!(def.is_expanded());
    }

    #[test]
    fn test_clipping() {
        let def = ViewportDefinition::new(0..5, 0..4, false).clipped(3, 2);
        assert_eq!(def, ViewportDefinition::full(3, 2));
    }
}
