//! definition.rs
//! The compiled view definition delivered with a structure-compiled event.

use super::lineage::DependencyGraph;
use super::types::{ValueProperties, ValueRequirement, ValueSpecification};

/// A position in the portfolio tree. Positions whose security could not be
/// resolved still appear as rows but never resolve to a value.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub id: String,
    pub name: String,
    pub resolved: bool,
}

impl Position {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), resolved: true }
    }

    pub fn unresolved(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), resolved: false }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioNode {
    pub id: String,
    pub name: String,
    pub children: Vec<PortfolioNode>,
    pub positions: Vec<Position>,
}

impl PortfolioNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), children: Vec::new(), positions: Vec::new() }
    }

    pub fn child(mut self, node: PortfolioNode) -> Self {
        self.children.push(node);
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.positions.push(position);
        self
    }
}

/// A value name plus constraints requested for every portfolio row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequirementColumn {
    pub value_name: String,
    pub constraints: ValueProperties,
}

impl RequirementColumn {
    pub fn new(value_name: impl Into<String>, constraints: ValueProperties) -> Self {
        Self { value_name: value_name.into(), constraints }
    }
}

/// A resolved output together with every requirement it satisfies.
#[derive(Debug, Clone, PartialEq)]
pub struct TerminalOutput {
    pub specification: ValueSpecification,
    pub requirements: Vec<ValueRequirement>,
}

#[derive(Debug, Clone, Default)]
pub struct CalculationConfiguration {
    pub name: String,
    pub portfolio_requirements: Vec<RequirementColumn>,
    pub specific_requirements: Vec<ValueRequirement>,
    pub terminal_outputs: Vec<TerminalOutput>,
    pub lineage: DependencyGraph,
}

impl CalculationConfiguration {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    pub fn portfolio_requirement(mut self, column: RequirementColumn) -> Self {
        self.portfolio_requirements.push(column);
        self
    }

    pub fn specific_requirement(mut self, requirement: ValueRequirement) -> Self {
        self.specific_requirements.push(requirement);
        self
    }

    /// Records that `specification` satisfies `requirement`.
    pub fn terminal_output(mut self, specification: ValueSpecification, requirement: ValueRequirement) -> Self {
        match self.terminal_outputs.iter_mut().find(|t| t.specification == specification) {
            Some(existing) => existing.requirements.push(requirement),
            None => self.terminal_outputs.push(TerminalOutput { specification, requirements: vec![requirement] }),
        }
        self
    }

    pub fn with_lineage(mut self, lineage: DependencyGraph) -> Self {
        self.lineage = lineage;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompiledViewDefinition {
    /// `None` when the view has no portfolio; the portfolio grid is then empty.
    pub portfolio: Option<PortfolioNode>,
    /// In declaration order.
    pub configurations: Vec<CalculationConfiguration>,
}

impl CompiledViewDefinition {
    pub fn configuration(&self, name: &str) -> Option<&CalculationConfiguration> {
        self.configurations.iter().find(|c| c.name == name)
    }
}
