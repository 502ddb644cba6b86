//! The compute engine boundary: the data it hands to the grid layer and the
//! point-query handle it exposes per cycle.
pub mod cycle;
pub mod definition;
pub mod events;
pub mod lineage;
pub mod types;

// Re-export key types for convenient access
pub use cycle::{CycleHandle, CycleId, EmptyCycle, QueryResult, SnapshotCycle, ViewCycleResult};
pub use definition::{CalculationConfiguration, CompiledViewDefinition, PortfolioNode, Position, RequirementColumn};
pub use events::{event_channel, EngineEvent};
pub use lineage::{DependencyGraph, LineageNode};
pub use types::{
    ComputationFailure, ComputedValue, TargetKind, TargetSpec, Value, ValueKind, ValueProperties,
    ValueRequirement, ValueSpecification,
};
