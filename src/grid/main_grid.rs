//! main_grid.rs
//! A top-level grid: its current structure, the viewports over it and the
//! dependency graphs opened from its cells.

use super::depgraph::DependencyGraphGrid;
use super::GridType;
use crate::cache::ResultsCache;
use crate::config::GridConfig;
use crate::engine::{CompiledViewDefinition, CycleHandle};
use crate::error::{GridError, GridResult};
use crate::structure::{GridStructure, MainGridStructure};
use crate::viewport::{Viewport, ViewportDefinition, ViewportResults};
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug)]
pub struct MainGrid {
    grid_type: GridType,
    structure_callback_id: String,
    structure: Arc<MainGridStructure>,
    viewports: HashMap<String, Viewport>,
    depgraphs: HashMap<String, DependencyGraphGrid>,
}

impl MainGrid {
    pub fn new(grid_type: GridType, structure_callback_id: impl Into<String>) -> Self {
        Self {
            grid_type,
            structure_callback_id: structure_callback_id.into(),
            structure: Arc::new(MainGridStructure::empty()),
            viewports: HashMap::new(),
            depgraphs: HashMap::new(),
        }
    }

    pub fn grid_type(&self) -> GridType { self.grid_type }

    pub fn structure_callback_id(&self) -> &str { &self.structure_callback_id }

    pub fn structure(&self) -> &Arc<MainGridStructure> { &self.structure }

    /// Swaps in a rebuilt structure. Viewports are clipped to the new bounds
    /// and every dependency graph is closed, since the cells they were opened
    /// from may no longer exist. Returns the callback ids to notify.
    pub fn update_structure(&mut self, structure: MainGridStructure, cache: &ResultsCache) -> Vec<String> {
        self.structure = Arc::new(structure);

        let mut notify = vec![self.structure_callback_id.clone()];
        for (graph_id, graph) in self.depgraphs.drain() {
            tracing::debug!(graph_id = %graph_id, "dependency graph closed by structure rebuild");
            notify.push(graph.structure_callback_id().to_string());
        }

        let structure = &*self.structure;
        for viewport in self.viewports.values_mut() {
            viewport.clip(structure, cache);
            notify.push(viewport.callback_id().to_string());
        }
        notify
    }

    /// Re-renders every viewport after `cache` ingested a cycle, then lets
    /// each dependency graph query `cycle`. Returns the callback ids of
    /// viewports whose visible data changed.
    pub fn update_results(&mut self, cache: &ResultsCache, cycle: &Arc<dyn CycleHandle>) -> Vec<String> {
        let structure = &*self.structure;
        let mut changed: Vec<String> = self
            .viewports
            .par_iter_mut()
            .filter_map(|(_, viewport)| viewport.refresh(structure, cache).then(|| viewport.callback_id().to_string()))
            .collect();

        for graph in self.depgraphs.values_mut() {
            changed.extend(graph.update_results(Arc::clone(cycle)));
        }
        changed
    }

    pub fn create_viewport(
        &mut self,
        viewport_id: &str,
        callback_id: &str,
        definition: ViewportDefinition,
        cache: &ResultsCache,
    ) -> GridResult<u64> {
        if self.viewports.contains_key(viewport_id) {
            return Err(GridError::DuplicateViewport(viewport_id.to_string()));
        }
        let viewport = Viewport::new(callback_id, definition, &*self.structure, cache)?;
        let version = viewport.version();
        self.viewports.insert(viewport_id.to_string(), viewport);
        Ok(version)
    }

    pub fn update_viewport(&mut self, viewport_id: &str, definition: ViewportDefinition, cache: &ResultsCache) -> GridResult<u64> {
        let viewport = self
            .viewports
            .get_mut(viewport_id)
            .ok_or_else(|| GridError::ViewportNotFound(viewport_id.to_string()))?;
        viewport.update(definition, &*self.structure, cache)
    }

    pub fn delete_viewport(&mut self, viewport_id: &str) -> GridResult<()> {
        self.viewports
            .remove(viewport_id)
            .map(|_| ())
            .ok_or_else(|| GridError::ViewportNotFound(viewport_id.to_string()))
    }

    pub fn data(&self, viewport_id: &str) -> GridResult<&ViewportResults> {
        self.viewports
            .get(viewport_id)
            .map(Viewport::results)
            .ok_or_else(|| GridError::ViewportNotFound(viewport_id.to_string()))
    }

    pub fn viewport_count(&self) -> usize { self.viewports.len() }

    /// Opens the lineage of cell (`row`, `col`) as a new dependency graph grid.
    #[allow(clippy::too_many_arguments)]
    pub fn open_dependency_graph(
        &mut self,
        graph_id: &str,
        callback_id: &str,
        row: usize,
        col: usize,
        definition: &CompiledViewDefinition,
        config: &GridConfig,
        cycle: Arc<dyn CycleHandle>,
    ) -> GridResult<()> {
        if self.depgraphs.contains_key(graph_id) {
            return Err(GridError::DuplicateDependencyGraph(graph_id.to_string()));
        }
        self.structure.check_bounds(&[row], &[col])?;
        let (calc_config, specification) =
            self.structure.specification_for(row, col).ok_or(GridError::NoValueSpecification { row, col })?;
        let calculation = definition
            .configuration(calc_config)
            .ok_or_else(|| GridError::UnknownCalculationConfiguration(calc_config.to_string()))?;

        let graph = DependencyGraphGrid::open(callback_id, specification, calc_config, &calculation.lineage, config, cycle);
        tracing::info!(
            graph_id,
            grid = %self.grid_type,
            row,
            col,
            rows = graph.structure().row_count(),
            "dependency graph opened"
        );
        self.depgraphs.insert(graph_id.to_string(), graph);
        Ok(())
    }

    pub fn close_dependency_graph(&mut self, graph_id: &str) -> GridResult<()> {
        self.depgraphs
            .remove(graph_id)
            .map(|_| ())
            .ok_or_else(|| GridError::DependencyGraphNotFound(graph_id.to_string()))
    }

    pub fn dependency_graph(&self, graph_id: &str) -> GridResult<&DependencyGraphGrid> {
        self.depgraphs.get(graph_id).ok_or_else(|| GridError::DependencyGraphNotFound(graph_id.to_string()))
    }

    pub fn dependency_graph_mut(&mut self, graph_id: &str) -> GridResult<&mut DependencyGraphGrid> {
        self.depgraphs.get_mut(graph_id).ok_or_else(|| GridError::DependencyGraphNotFound(graph_id.to_string()))
    }

    pub fn dependency_graph_count(&self) -> usize { self.depgraphs.len() }
}
