//! Grid orchestration: structures, viewports and drill-down graphs per grid.
pub mod depgraph;
pub mod main_grid;

pub use depgraph::DependencyGraphGrid;
pub use main_grid::MainGrid;

use crate::error::GridError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two top-level grids of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridType {
    Portfolio,
    Primitives,
}

impl GridType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GridType::Portfolio => "portfolio",
            GridType::Primitives => "primitives",
        }
    }
}

impl fmt::Display for GridType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GridType {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "portfolio" => Ok(GridType::Portfolio),
            "primitives" => Ok(GridType::Primitives),
            other => Err(GridError::UnknownGridType(other.to_string())),
        }
    }
}
