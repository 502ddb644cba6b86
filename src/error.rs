//! error.rs
//! Caller-visible failures of grid, viewport and view operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Row index {index} out of bounds for grid with {rows} rows")]
    RowOutOfBounds { index: usize, rows: usize },
    #[error("Column index {index} out of bounds for grid with {columns} columns")]
    ColumnOutOfBounds { index: usize, columns: usize },
    #[error("No viewport found with id '{0}'")]
    ViewportNotFound(String),
    #[error("A viewport with id '{0}' already exists")]
    DuplicateViewport(String),
    #[error("No dependency graph found with id '{0}'")]
    DependencyGraphNotFound(String),
    #[error("A dependency graph with id '{0}' already exists")]
    DuplicateDependencyGraph(String),
    #[error("No view found with id '{0}'")]
    ViewNotFound(String),
    #[error("Unknown grid type '{0}'")]
    UnknownGridType(String),
    #[error("Unknown calculation configuration '{0}'")]
    UnknownCalculationConfiguration(String),
    #[error("No value specification for cell ({row}, {col})")]
    NoValueSpecification { row: usize, col: usize },
}

pub type GridResult<T> = Result<T, GridError>;
