//! depgraph.rs
//! Viewport over a dependency graph grid. Values come from point queries
//! against one compute cycle, for the visible rows only.

use super::definition::ViewportDefinition;
use super::main_grid::Viewport;
use crate::cache::ResultsCache;
use crate::engine::{CycleHandle, ValueSpecification};
use crate::error::GridResult;
use crate::structure::depgraph::VALUE_COL;
use crate::structure::{DependencyGraphStructure, GridStructure};

#[derive(Debug, Clone)]
pub struct DependencyGraphViewport {
    viewport: Viewport,
}

/// Specifications whose values `definition` shows.
pub fn visible_specifications(structure: &DependencyGraphStructure, definition: &ViewportDefinition) -> Vec<ValueSpecification> {
    if !definition.columns().contains(&VALUE_COL) {
        return Vec::new();
    }
    structure.specifications(definition.rows())
}

/// Queries `cycle` for `specs` and stores the answers in `cache`.
pub fn load(structure: &DependencyGraphStructure, cache: &mut ResultsCache, cycle: &dyn CycleHandle, specs: &[ValueSpecification]) {
    if specs.is_empty() {
        return;
    }
    let values = cycle.query(structure.calc_config(), specs);
    tracing::debug!(requested = specs.len(), found = values.len(), cycle = ?cycle.cycle_id(), "dependency graph query");
    cache.put_query(structure.calc_config(), cycle.cycle_id(), values);
}

impl DependencyGraphViewport {
    pub fn new(
        callback_id: impl Into<String>,
        definition: ViewportDefinition,
        structure: &DependencyGraphStructure,
        cache: &mut ResultsCache,
        cycle: &dyn CycleHandle,
    ) -> GridResult<Self> {
        structure.check_bounds(definition.rows(), definition.columns())?;
        load(structure, cache, cycle, &visible_specifications(structure, &definition));
        let viewport = Viewport::new(callback_id, definition, structure, cache)?;
        Ok(Self { viewport })
    }

    pub fn update(
        &mut self,
        definition: ViewportDefinition,
        structure: &DependencyGraphStructure,
        cache: &mut ResultsCache,
        cycle: &dyn CycleHandle,
    ) -> GridResult<u64> {
        structure.check_bounds(definition.rows(), definition.columns())?;
        load(structure, cache, cycle, &visible_specifications(structure, &definition));
        self.viewport.update(definition, structure, cache)
    }

    /// Re-renders from a cache already loaded for the current cycle.
    pub fn refresh(&mut self, structure: &DependencyGraphStructure, cache: &ResultsCache) -> bool {
        self.viewport.refresh(structure, cache)
    }

    pub fn visible_specifications(&self, structure: &DependencyGraphStructure) -> Vec<ValueSpecification> {
        visible_specifications(structure, self.viewport.definition())
    }

    pub fn viewport(&self) -> &Viewport { &self.viewport }
}
