//! Shared fixtures for the unit test suites.

use crate::config::GridConfig;
use crate::engine::{
    CalculationConfiguration, CompiledViewDefinition, ComputedValue, CycleId, DependencyGraph, LineageNode,
    PortfolioNode, Position, RequirementColumn, TargetSpec, Value, ValueKind, ValueProperties, ValueRequirement,
    ValueSpecification, ViewCycleResult,
};

pub fn config() -> GridConfig {
    GridConfig::default()
        .with_value_kind("PV", ValueKind::Double)
        .with_value_kind("DiscountCurve", ValueKind::Curve)
        .with_value_kind("ForwardCurve", ValueKind::Curve)
        .with_value_kind("MarketValue", ValueKind::Double)
}

pub fn usd() -> ValueProperties {
    ValueProperties::new().with("Currency", "USD")
}

pub fn pv_req(position: &str) -> ValueRequirement {
    ValueRequirement::new("PV", TargetSpec::position(position), ValueProperties::new())
}

pub fn pv_spec(position: &str) -> ValueSpecification {
    ValueSpecification::new("PV", TargetSpec::position(position), usd())
}

pub fn curve_spec(name: &str) -> ValueSpecification {
    ValueSpecification::new(name, TargetSpec::primitive("USD"), usd())
}

pub fn market_spec() -> ValueSpecification {
    ValueSpecification::new("MarketValue", TargetSpec::primitive("USD-1Y"), ValueProperties::new())
}

/// PV(pos1) <- [DiscountCurve, ForwardCurve], both curves <- MarketValue(USD-1Y).
pub fn diamond_lineage() -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    graph.add_node(
        LineageNode::new("PresentValue", TargetSpec::position("pos1"))
            .input(curve_spec("DiscountCurve"))
            .input(curve_spec("ForwardCurve"))
            .output(pv_spec("pos1")),
    );
    graph.add_node(
        LineageNode::new("DiscountCurveFit", TargetSpec::primitive("USD"))
            .input(market_spec())
            .output(curve_spec("DiscountCurve")),
    );
    graph.add_node(
        LineageNode::new("ForwardCurveFit", TargetSpec::primitive("USD"))
            .input(market_spec())
            .output(curve_spec("ForwardCurve")),
    );
    graph.add_node(LineageNode::new("MarketDataSource", TargetSpec::primitive("USD-1Y")).output(market_spec()));
    graph.add_node(LineageNode::new("PresentValue", TargetSpec::position("pos2")).output(pv_spec("pos2")));
    graph
}

/// One node "Book A" holding "Pos1" and "Pos2"; configuration "Default"
/// requests PV with no constraints.
pub fn book_definition() -> CompiledViewDefinition {
    let book = PortfolioNode::new("book-a", "Book A")
        .position(Position::new("pos1", "Pos1"))
        .position(Position::new("pos2", "Pos2"));
    let default = CalculationConfiguration::new("Default")
        .portfolio_requirement(RequirementColumn::new("PV", ValueProperties::new()))
        .terminal_output(pv_spec("pos1"), pv_req("pos1"))
        .terminal_output(pv_spec("pos2"), pv_req("pos2"))
        .with_lineage(diamond_lineage());
    CompiledViewDefinition { portfolio: Some(book), configurations: vec![default] }
}

/// Two books with two positions each, and an extra column.
pub fn wide_definition() -> CompiledViewDefinition {
    let root = PortfolioNode::new("root", "Root")
        .child(
            PortfolioNode::new("book-a", "Book A")
                .position(Position::new("pos1", "Pos1"))
                .position(Position::new("pos2", "Pos2")),
        )
        .child(PortfolioNode::new("book-b", "Book B").position(Position::new("pos3", "Pos3")));
    let default = CalculationConfiguration::new("Default")
        .portfolio_requirement(RequirementColumn::new("PV", ValueProperties::new()))
        .portfolio_requirement(RequirementColumn::new("PV", usd()))
        .terminal_output(pv_spec("pos1"), pv_req("pos1"));
    CompiledViewDefinition { portfolio: Some(root), configurations: vec![default] }
}

pub fn book_cycle(cycle_id: u64, pos1: f64, pos2: f64) -> ViewCycleResult {
    let mut result = ViewCycleResult::new(CycleId(cycle_id));
    result.push("Default", ComputedValue::ok(pv_spec("pos1"), Value::Double(pos1)));
    result.push("Default", ComputedValue::ok(pv_spec("pos2"), Value::Double(pos2)));
    result.push("Default", ComputedValue::ok(market_spec(), Value::Double(0.05)));
    result
}
