//! types.rs
//! Identity types shared with the compute engine: targets, properties,
//! requirements, specifications and computed values.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// The kind of object a computation is performed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TargetKind {
    PortfolioNode,
    Position,
    Primitive,
}

impl TargetKind {
    pub fn label(&self) -> &'static str {
        match self {
            TargetKind::PortfolioNode => "Portfolio Node",
            TargetKind::Position => "Position",
            TargetKind::Primitive => "Primitive",
        }
    }
}

/// Stable identifier of a computation target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetSpec {
    pub kind: TargetKind,
    pub id: String,
}

impl TargetSpec {
    pub fn new(kind: TargetKind, id: impl Into<String>) -> Self {
        Self { kind, id: id.into() }
    }
    pub fn node(id: impl Into<String>) -> Self { Self::new(TargetKind::PortfolioNode, id) }
    pub fn position(id: impl Into<String>) -> Self { Self::new(TargetKind::Position, id) }
    pub fn primitive(id: impl Into<String>) -> Self { Self::new(TargetKind::Primitive, id) }
}

impl fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// A set of named properties, each with a sorted, de-duplicated list of values.
///
/// Used both as the constraints of a requirement and as the resolved
/// properties of a specification. Equality and hashing are structural.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ValueProperties(BTreeMap<String, SmallVec<[String; 2]>>);

impl ValueProperties {
    pub fn new() -> Self { Self::default() }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let values = self.0.entry(name.into()).or_default();
        let value = value.into();
        if let Err(pos) = values.binary_search(&value) {
            values.insert(pos, value);
        }
        self
    }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(|v| v.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &[String])> {
        self.0.iter().map(|(k, v)| (k, v.as_slice()))
    }
}

impl fmt::Display for ValueProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, values) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{}={}", name, values.join("|"))?;
        }
        Ok(())
    }
}

/// A request for a named value on a target, subject to constraints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueRequirement {
    pub value_name: String,
    pub target: TargetSpec,
    pub constraints: ValueProperties,
}

impl ValueRequirement {
    pub fn new(value_name: impl Into<String>, target: TargetSpec, constraints: ValueProperties) -> Self {
        Self { value_name: value_name.into(), target, constraints }
    }
}

/// The fully resolved identity of one computed output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ValueSpecification {
    pub value_name: String,
    pub target: TargetSpec,
    pub properties: ValueProperties,
}

impl ValueSpecification {
    pub fn new(value_name: impl Into<String>, target: TargetSpec, properties: ValueProperties) -> Self {
        Self { value_name: value_name.into(), target, properties }
    }
}

/// Static type of the values produced under a value name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ValueKind {
    Double,
    Text,
    Series,
    Matrix,
    Curve,
    #[default]
    Unknown,
}

impl ValueKind {
    /// Only scalar numerics keep a history buffer.
    pub fn is_history_worthy(&self) -> bool {
        matches!(self, ValueKind::Double)
    }
}

/// A computed value as delivered by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Double(f64),
    Text(String),
    /// Shared reference to a vector (e.g. a cash-flow ladder).
    Series(Arc<Vec<f64>>),
    Matrix(Arc<Vec<Vec<f64>>>),
    /// (x, y) points of a curve.
    Curve(Arc<Vec<(f64, f64)>>),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Double(_) => ValueKind::Double,
            Value::Text(_) => ValueKind::Text,
            Value::Series(_) => ValueKind::Series,
            Value::Matrix(_) => ValueKind::Matrix,
            Value::Curve(_) => ValueKind::Curve,
        }
    }
}

/// An engine-side failure to produce a value.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{function} failed: {message}")]
pub struct ComputationFailure {
    pub function: String,
    pub message: String,
}

impl ComputationFailure {
    pub fn new(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self { function: function.into(), message: message.into() }
    }
}

/// One (specification, outcome) pair from a cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedValue {
    pub specification: ValueSpecification,
    pub outcome: Result<Value, ComputationFailure>,
}

impl ComputedValue {
    pub fn ok(specification: ValueSpecification, value: Value) -> Self {
        Self { specification, outcome: Ok(value) }
    }

    pub fn failed(specification: ValueSpecification, failure: ComputationFailure) -> Self {
        Self { specification, outcome: Err(failure) }
    }
}
