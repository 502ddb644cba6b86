//! lineage.rs
//! Per-configuration lineage graph reported by the compute engine.
//! Nodes are function applications; an edge runs from the producer of a
//! value to every node consuming it.

use super::types::{TargetSpec, ValueSpecification};
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// One function application in the lineage graph.
#[derive(Debug, Clone, PartialEq)]
pub struct LineageNode {
    pub function_name: String,
    pub target: TargetSpec,
    /// Inputs in the order the function declared them.
    pub inputs: Vec<ValueSpecification>,
    pub outputs: Vec<ValueSpecification>,
}

impl LineageNode {
    pub fn new(function_name: impl Into<String>, target: TargetSpec) -> Self {
        Self { function_name: function_name.into(), target, inputs: Vec::new(), outputs: Vec::new() }
    }

    pub fn input(mut self, spec: ValueSpecification) -> Self {
        self.inputs.push(spec);
        self
    }

    pub fn output(mut self, spec: ValueSpecification) -> Self {
        self.outputs.push(spec);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: DiGraph<LineageNode, ValueSpecification>,
    producers: HashMap<ValueSpecification, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self { Self::default() }

    /// Adds a node and wires it to every already-known producer of its inputs
    /// and to every already-known consumer of its outputs.
    pub fn add_node(&mut self, node: LineageNode) -> NodeIndex {
        let outputs = node.outputs.clone();
        let inputs = node.inputs.clone();
        let idx = self.graph.add_node(node);

        for spec in &inputs {
            if let Some(&producer) = self.producers.get(spec) {
                self.graph.add_edge(producer, idx, spec.clone());
            }
        }

        for spec in outputs {
            let consumers: Vec<NodeIndex> = self
                .graph
                .node_indices()
                .filter(|&n| n != idx && self.graph[n].inputs.contains(&spec))
                .collect();
            for consumer in consumers {
                self.graph.add_edge(idx, consumer, spec.clone());
            }
            self.producers.insert(spec, idx);
        }
        idx
    }

    pub fn node(&self, idx: NodeIndex) -> Option<&LineageNode> {
        self.graph.node_weight(idx)
    }

    /// The node producing `spec`, if the engine reported one.
    pub fn producer_of(&self, spec: &ValueSpecification) -> Option<NodeIndex> {
        self.producers.get(spec).copied()
    }

    pub fn node_count(&self) -> usize { self.graph.node_count() }

    pub fn is_cyclic(&self) -> bool { is_cyclic_directed(&self.graph) }
}
