//! Immutable grid structures: the rows, columns and cell-to-value lookup of
//! one grid, rebuilt wholesale on every structure-compiled event.
pub mod column;
pub mod depgraph;
pub mod main_grid;
pub mod node;

pub use column::{ColumnGroup, ColumnKey, ColumnMeta, GridColumns};
pub use depgraph::{DependencyGraphRow, DependencyGraphStructure};
pub use main_grid::{MainGridStructure, Row, TargetRef};
pub use node::AnalyticsNode;

use crate::engine::{ValueKind, ValueSpecification};
use crate::error::{GridError, GridResult};
use std::borrow::Cow;

/// What a single (row, column) of a grid shows.
#[derive(Debug, Clone, PartialEq)]
pub enum CellTarget<'a> {
    /// Static text taken from the row itself.
    Text(Cow<'a, str>),
    /// A computed value, read from a results cache.
    Resolved {
        calc_config: &'a str,
        specification: &'a ValueSpecification,
        kind: ValueKind,
    },
    /// No value specification resolves for this cell.
    Unresolved,
}

pub trait GridStructure {
    fn row_count(&self) -> usize;
    fn column_count(&self) -> usize;
    fn cell_target(&self, row: usize, col: usize) -> CellTarget<'_>;

    /// Rejects any index outside the current bounds.
    fn check_bounds(&self, rows: &[usize], cols: &[usize]) -> GridResult<()> {
        let (row_count, col_count) = (self.row_count(), self.column_count());
        if let Some(&index) = rows.iter().find(|&&r| r >= row_count) {
            return Err(GridError::RowOutOfBounds { index, rows: row_count });
        }
        if let Some(&index) = cols.iter().find(|&&c| c >= col_count) {
            return Err(GridError::ColumnOutOfBounds { index, columns: col_count });
        }
        Ok(())
    }
}
