//! cell.rs
//! Rendered viewport data and the renderer shared by every viewport kind.

use super::definition::ViewportDefinition;
use crate::cache::ResultsCache;
use crate::engine::Value;
use crate::structure::{CellTarget, GridStructure};

#[derive(Debug, Clone, PartialEq)]
pub enum ViewportCell {
    Value {
        value: Value,
        /// Oldest first. Present only for history-worthy values.
        history: Option<Vec<Value>>,
        /// Written by the most recent cache update.
        updated: bool,
    },
    /// No value specification resolves, or no value has arrived yet.
    Empty,
    /// The engine failed to compute the value in the latest cycle.
    Error { message: String, updated: bool },
}

impl ViewportCell {
    pub fn text(s: impl Into<String>) -> Self {
        ViewportCell::Value { value: Value::Text(s.into()), history: None, updated: false }
    }

    pub fn is_updated(&self) -> bool {
        match self {
            ViewportCell::Value { updated, .. } | ViewportCell::Error { updated, .. } => *updated,
            ViewportCell::Empty => false,
        }
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            ViewportCell::Value { value, .. } => Some(value),
            _ => None,
        }
    }
}

/// One visible row: its grid index and a cell per visible column.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportRow {
    pub index: usize,
    pub cells: Vec<ViewportCell>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewportResults {
    pub version: u64,
    pub expanded: bool,
    pub columns: Vec<usize>,
    pub rows: Vec<ViewportRow>,
}

impl ViewportResults {
    /// True if any visible cell was written by the most recent cache update.
    pub fn has_updates(&self) -> bool {
        self.rows.iter().flat_map(|r| r.cells.iter()).any(ViewportCell::is_updated)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&ViewportCell> {
        self.rows.get(row)?.cells.get(col)
    }
}

/// Renders `definition`'s window of `structure` from `cache`.
pub fn render<S: GridStructure>(
    structure: &S,
    cache: &ResultsCache,
    definition: &ViewportDefinition,
    version: u64,
) -> ViewportResults {
    let rows = definition
        .rows()
        .iter()
        .map(|&row| ViewportRow {
            index: row,
            cells: definition.columns().iter().map(|&col| render_cell(structure.cell_target(row, col), cache)).collect(),
        })
        .collect();

    ViewportResults { version, expanded: definition.is_expanded(), columns: definition.columns().to_vec(), rows }
}

fn render_cell(target: CellTarget<'_>, cache: &ResultsCache) -> ViewportCell {
    match target {
        CellTarget::Text(text) => ViewportCell::text(text.into_owned()),
        CellTarget::Unresolved => ViewportCell::Empty,
        CellTarget::Resolved { calc_config, specification, kind } => {
            let item = cache.get(calc_config, specification, kind);
            let updated = cache.is_updated(item);
            match item.latest() {
                Some(Ok(value)) => ViewportCell::Value {
                    value: value.clone(),
                    history: item.history().map(|h| h.to_vec()),
                    updated,
                },
                Some(Err(failure)) => ViewportCell::Error { message: failure.to_string(), updated },
                None => ViewportCell::Empty,
            }
        }
    }
}
