//! depgraph.rs
//! Drill-down structure exposing the lineage of a single cell.
//!
//! Rows are a depth-first, pre-order walk backwards through the lineage graph
//! from the node producing the root value. Every node with inputs gets an
//! `AnalyticsNode` covering its own row and the rows of all its inputs, so a
//! client can collapse a sub-tree by hiding one contiguous range.

use super::column::{ColumnMeta, GridColumns};
use super::node::AnalyticsNode;
use super::{CellTarget, GridStructure};
use crate::config::GridConfig;
use crate::engine::{DependencyGraph, ValueKind, ValueSpecification};
use std::borrow::Cow;

pub const TARGET_COL: usize = 0;
pub const TYPE_COL: usize = 1;
pub const VALUE_NAME_COL: usize = 2;
pub const VALUE_COL: usize = 3;
pub const FUNCTION_COL: usize = 4;
pub const PROPERTIES_COL: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct DependencyGraphRow {
    pub specification: ValueSpecification,
    /// `None` when the engine reported no producer (e.g. raw market data).
    pub function_name: Option<String>,
    pub kind: ValueKind,
}

#[derive(Debug, Clone)]
pub struct DependencyGraphStructure {
    calc_config: String,
    rows: Vec<DependencyGraphRow>,
    columns: GridColumns,
    root: Option<AnalyticsNode>,
}

impl DependencyGraphStructure {
    pub fn build(root: &ValueSpecification, calc_config: &str, lineage: &DependencyGraph, config: &GridConfig) -> Self {
        if lineage.is_cyclic() {
            tracing::warn!(calc_config, value = %root.value_name, target = %root.target, "cyclic lineage, repeated values are not expanded");
        }
        let mut builder = Builder { lineage, config, rows: Vec::new(), path: Vec::new() };
        let root_node = builder.visit(root);
        tracing::debug!(calc_config, lineage_nodes = lineage.node_count(), rows = builder.rows.len(), "dependency graph structure built");
        Self { calc_config: calc_config.to_string(), rows: builder.rows, columns: Self::fixed_columns(), root: root_node }
    }

    fn fixed_columns() -> GridColumns {
        let mut columns = GridColumns::new(ColumnMeta::fixed("Target", "Computation target"));
        let group = "Dependencies";
        columns.add_fixed_column(ColumnMeta::fixed("Type", "Target type"), group);
        columns.add_fixed_column(ColumnMeta::fixed("Value Name", "Value name"), group);
        let mut value = ColumnMeta::fixed("Value", "Computed value");
        value.kind = ValueKind::Unknown;
        columns.add_fixed_column(value, group);
        columns.add_fixed_column(ColumnMeta::fixed("Function", "Producing function"), group);
        columns.add_fixed_column(ColumnMeta::fixed("Properties", "Value properties"), group);
        columns
    }

    pub fn calc_config(&self) -> &str { &self.calc_config }

    pub fn rows(&self) -> &[DependencyGraphRow] { &self.rows }

    pub fn columns(&self) -> &GridColumns { &self.columns }

    pub fn root(&self) -> Option<&AnalyticsNode> { self.root.as_ref() }

    /// Specifications of the given rows, skipping indices out of range.
    pub fn specifications(&self, rows: &[usize]) -> Vec<ValueSpecification> {
        rows.iter().filter_map(|&r| self.rows.get(r)).map(|r| r.specification.clone()).collect()
    }
}

struct Builder<'a> {
    lineage: &'a DependencyGraph,
    config: &'a GridConfig,
    rows: Vec<DependencyGraphRow>,
    /// Specifications on the current traversal path.
    path: Vec<ValueSpecification>,
}

impl<'a> Builder<'a> {
    fn visit(&mut self, spec: &ValueSpecification) -> Option<AnalyticsNode> {
        let lineage = self.lineage;
        let start = self.rows.len();
        let producer = lineage.producer_of(spec).and_then(|idx| lineage.node(idx));
        self.rows.push(DependencyGraphRow {
            specification: spec.clone(),
            function_name: producer.map(|n| n.function_name.clone()),
            kind: self.config.value_kind(&spec.value_name),
        });

        let node = producer?;
        if node.inputs.is_empty() {
            return None;
        }
        if self.path.contains(spec) {
            tracing::debug!(value = %spec.value_name, target = %spec.target, "already on path, not expanding");
            return None;
        }

        self.path.push(spec.clone());
        let children = node.inputs.iter().filter_map(|input| self.visit(input)).collect();
        self.path.pop();

        Some(AnalyticsNode::new(start, self.rows.len() - 1, children))
    }
}

impl GridStructure for DependencyGraphStructure {
    fn row_count(&self) -> usize { self.rows.len() }

    fn column_count(&self) -> usize { self.columns.len() }

    fn cell_target(&self, row: usize, col: usize) -> CellTarget<'_> {
        let Some(r) = self.rows.get(row) else { return CellTarget::Unresolved };
        let spec = &r.specification;
        match col {
            TARGET_COL => CellTarget::Text(Cow::Borrowed(&spec.target.id)),
            TYPE_COL => CellTarget::Text(Cow::Borrowed(spec.target.kind.label())),
            VALUE_NAME_COL => CellTarget::Text(Cow::Borrowed(&spec.value_name)),
            VALUE_COL => CellTarget::Resolved { calc_config: &self.calc_config, specification: spec, kind: r.kind },
            FUNCTION_COL => match &r.function_name {
                Some(name) => CellTarget::Text(Cow::Borrowed(name)),
                None => CellTarget::Unresolved,
            },
            PROPERTIES_COL => CellTarget::Text(Cow::Owned(spec.properties.to_string())),
            _ => CellTarget::Unresolved,
        }
    }
}
