//! main_grid.rs
//! Structure of the two top-level grids: the portfolio tree and the flat
//! list of primitive targets.

use super::column::{ColumnKey, ColumnMeta, GridColumns};
use super::node::AnalyticsNode;
use super::{CellTarget, GridStructure};
use crate::config::GridConfig;
use crate::engine::{
    CompiledViewDefinition, PortfolioNode, Position, TargetKind, TargetSpec, ValueRequirement, ValueSpecification,
};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

/// A row's target. Unresolved targets render every value cell empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetRef {
    Resolved(TargetSpec),
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub target: TargetRef,
    pub label: String,
}

/// The targets the row builder visits.
enum Visit<'a> {
    Node(&'a PortfolioNode),
    Leaf(&'a Position),
    Primitive(&'a TargetSpec),
}

fn row_for(visit: Visit<'_>) -> Row {
    match visit {
        Visit::Node(node) => Row { target: TargetRef::Resolved(TargetSpec::node(&node.id)), label: node.name.clone() },
        Visit::Leaf(position) if position.resolved => {
            Row { target: TargetRef::Resolved(TargetSpec::position(&position.id)), label: position.name.clone() }
        }
        Visit::Leaf(position) => Row { target: TargetRef::Unresolved, label: position.name.clone() },
        Visit::Primitive(target) => Row { target: TargetRef::Resolved(target.clone()), label: target.id.clone() },
    }
}

#[derive(Debug, Clone)]
pub struct MainGridStructure {
    rows: Vec<Row>,
    columns: GridColumns,
    /// Column index, then row target, to the specification the engine
    /// resolved for that cell.
    specs: HashMap<usize, HashMap<TargetSpec, ValueSpecification>>,
    /// Portfolio tree; `None` for flat grids.
    root: Option<AnalyticsNode>,
}

impl MainGridStructure {
    /// A structure with only the label column, used before the first compile.
    pub fn empty() -> Self {
        Self { rows: Vec::new(), columns: Self::label_columns(), specs: HashMap::new(), root: None }
    }

    fn label_columns() -> GridColumns {
        GridColumns::new(ColumnMeta::fixed("Label", "Target name"))
    }

    /// Builds the portfolio grid: rows in pre-order (node, child nodes, then
    /// the node's positions), one column per distinct portfolio requirement.
    pub fn portfolio(definition: &CompiledViewDefinition, config: &GridConfig) -> Self {
        let mut rows = Vec::new();
        let root = definition.portfolio.as_ref().map(|node| Self::walk_portfolio(node, &mut rows));

        let mut columns = Self::label_columns();
        for calc in &definition.configurations {
            for req in &calc.portfolio_requirements {
                let key = ColumnKey::new(&calc.name, &req.value_name, req.constraints.clone());
                columns.add_value_column(key, config.value_kind(&req.value_name));
            }
        }

        let specs = Self::index_specs(definition, &columns);
        Self { rows, columns, specs, root }
    }

    fn walk_portfolio(node: &PortfolioNode, rows: &mut Vec<Row>) -> AnalyticsNode {
        let start = rows.len();
        rows.push(row_for(Visit::Node(node)));
        let children = node.children.iter().map(|child| Self::walk_portfolio(child, rows)).collect();
        for position in &node.positions {
            rows.push(row_for(Visit::Leaf(position)));
        }
        AnalyticsNode::new(start, rows.len() - 1, children)
    }

    /// Builds the primitives grid: one row per distinct primitive target in
    /// first-seen order over the terminal outputs.
    pub fn primitives(definition: &CompiledViewDefinition, config: &GridConfig) -> Self {
        let mut seen = HashSet::new();
        let mut rows = Vec::new();
        let mut columns = Self::label_columns();

        for calc in &definition.configurations {
            for output in &calc.terminal_outputs {
                let target = &output.specification.target;
                if target.kind == TargetKind::Primitive && seen.insert(target.clone()) {
                    rows.push(row_for(Visit::Primitive(target)));
                }
            }
            for req in calc.specific_requirements.iter().filter(|r| r.target.kind == TargetKind::Primitive) {
                let key = ColumnKey::new(&calc.name, &req.value_name, req.constraints.clone());
                columns.add_value_column(key, config.value_kind(&req.value_name));
            }
        }

        let specs = Self::index_specs(definition, &columns);
        Self { rows, columns, specs, root: None }
    }

    /// Maps each requirement satisfied by a terminal output onto the column
    /// showing it. Requirements with no column are dropped.
    fn index_specs(
        definition: &CompiledViewDefinition,
        columns: &GridColumns,
    ) -> HashMap<usize, HashMap<TargetSpec, ValueSpecification>> {
        let mut specs: HashMap<usize, HashMap<TargetSpec, ValueSpecification>> = HashMap::new();
        for calc in &definition.configurations {
            for output in &calc.terminal_outputs {
                for requirement in &output.requirements {
                    let key = ColumnKey::new(&calc.name, &requirement.value_name, requirement.constraints.clone());
                    if let Some(col) = columns.index_of(&key) {
                        specs.entry(col).or_default().insert(requirement.target.clone(), output.specification.clone());
                    }
                }
            }
        }
        specs
    }

    pub fn rows(&self) -> &[Row] { &self.rows }

    pub fn row(&self, idx: usize) -> Option<&Row> { self.rows.get(idx) }

    pub fn columns(&self) -> &GridColumns { &self.columns }

    pub fn root(&self) -> Option<&AnalyticsNode> { self.root.as_ref() }

    /// Column showing `requirement` for `calc_config`, if any.
    pub fn column_for(&self, calc_config: &str, requirement: &ValueRequirement) -> Option<usize> {
        let key = ColumnKey::new(calc_config, &requirement.value_name, requirement.constraints.clone());
        self.columns.index_of(&key)
    }

    /// Resolves a value cell to its configuration and specification.
    pub fn specification_for(&self, row: usize, col: usize) -> Option<(&str, &ValueSpecification)> {
        match self.cell_target(row, col) {
            CellTarget::Resolved { calc_config, specification, .. } => Some((calc_config, specification)),
            _ => None,
        }
    }
}

impl GridStructure for MainGridStructure {
    fn row_count(&self) -> usize { self.rows.len() }

    fn column_count(&self) -> usize { self.columns.len() }

    fn cell_target(&self, row: usize, col: usize) -> CellTarget<'_> {
        let Some(r) = self.rows.get(row) else { return CellTarget::Unresolved };
        if col == 0 {
            return CellTarget::Text(Cow::Borrowed(&r.label));
        }
        let TargetRef::Resolved(target) = &r.target else { return CellTarget::Unresolved };
        let Some(meta) = self.columns.get(col) else { return CellTarget::Unresolved };
        let Some(key) = &meta.key else { return CellTarget::Unresolved };

        match self.specs.get(&col).and_then(|by_target| by_target.get(target)) {
            Some(specification) => CellTarget::Resolved { calc_config: &key.calc_config, specification, kind: meta.kind },
            None => CellTarget::Unresolved,
        }
    }
}
