//! cycle.rs
//! Results of one compute cycle, and the point-query handle used by
//! dependency graph viewports.

use super::types::{ComputationFailure, ComputedValue, Value, ValueSpecification};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct CycleId(pub u64);

/// Full result snapshot for one cycle, keyed by calculation configuration.
#[derive(Debug, Clone, Default)]
pub struct ViewCycleResult {
    pub cycle_id: CycleId,
    pub values: HashMap<String, Vec<ComputedValue>>,
}

impl ViewCycleResult {
    pub fn new(cycle_id: CycleId) -> Self {
        Self { cycle_id, values: HashMap::new() }
    }

    pub fn push(&mut self, calc_config: &str, value: ComputedValue) {
        self.values.entry(calc_config.to_string()).or_default().push(value);
    }

    pub fn value_count(&self) -> usize {
        self.values.values().map(Vec::len).sum()
    }
}

pub type QueryResult = Vec<(ValueSpecification, Result<Value, ComputationFailure>)>;

/// Access to the computation cache of one specific cycle.
pub trait CycleHandle: Send + Sync + fmt::Debug {
    fn cycle_id(&self) -> Option<CycleId>;

    /// Looks up `specs` in `calc_config`. Specifications the cycle holds no
    /// value for are omitted from the result.
    fn query(&self, calc_config: &str, specs: &[ValueSpecification]) -> QueryResult;
}

/// Stand-in used before any cycle has completed. Every query is empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyCycle;

impl CycleHandle for EmptyCycle {
    fn cycle_id(&self) -> Option<CycleId> { None }

    fn query(&self, _calc_config: &str, _specs: &[ValueSpecification]) -> QueryResult {
        Vec::new()
    }
}

/// A cycle handle answering from a retained result snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotCycle {
    cycle_id: CycleId,
    index: HashMap<String, HashMap<ValueSpecification, Result<Value, ComputationFailure>>>,
}

impl SnapshotCycle {
    pub fn new(result: &ViewCycleResult) -> Self {
        let index = result
            .values
            .iter()
            .map(|(config, values)| {
                let by_spec = values
                    .iter()
                    .map(|v| (v.specification.clone(), v.outcome.clone()))
                    .collect();
                (config.clone(), by_spec)
            })
            .collect();
        Self { cycle_id: result.cycle_id, index }
    }
}

impl CycleHandle for SnapshotCycle {
    fn cycle_id(&self) -> Option<CycleId> { Some(self.cycle_id) }

    fn query(&self, calc_config: &str, specs: &[ValueSpecification]) -> QueryResult {
        let Some(values) = self.index.get(calc_config) else { return Vec::new() };
        specs
            .iter()
            .filter_map(|spec| values.get(spec).map(|outcome| (spec.clone(), outcome.clone())))
            .collect()
    }
}
