//! depgraph.rs
//! A drill-down grid showing the lineage of one cell of a top-level grid.

use crate::cache::ResultsCache;
use crate::config::GridConfig;
use crate::display::format_trace;
use crate::engine::{CycleHandle, DependencyGraph, ValueSpecification};
use crate::error::{GridError, GridResult};
use crate::structure::DependencyGraphStructure;
use crate::viewport::{DependencyGraphViewport, ViewportDefinition, ViewportResults};
use crate::viewport::depgraph::load;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Debug)]
pub struct DependencyGraphGrid {
    structure_callback_id: String,
    structure: Arc<DependencyGraphStructure>,
    /// Values point-queried for the visible rows; kept per grid for history.
    cache: ResultsCache,
    /// The cycle viewports read from: the latest one seen by this grid.
    cycle: Arc<dyn CycleHandle>,
    viewports: HashMap<String, DependencyGraphViewport>,
}

impl DependencyGraphGrid {
    pub fn open(
        structure_callback_id: impl Into<String>,
        root: &ValueSpecification,
        calc_config: &str,
        lineage: &DependencyGraph,
        config: &GridConfig,
        cycle: Arc<dyn CycleHandle>,
    ) -> Self {
        let structure = DependencyGraphStructure::build(root, calc_config, lineage, config);
        Self {
            structure_callback_id: structure_callback_id.into(),
            structure: Arc::new(structure),
            cache: ResultsCache::for_config(config),
            cycle,
            viewports: HashMap::new(),
        }
    }

    pub fn structure_callback_id(&self) -> &str { &self.structure_callback_id }

    pub fn structure(&self) -> &Arc<DependencyGraphStructure> { &self.structure }

    pub fn cache(&self) -> &ResultsCache { &self.cache }

    pub fn viewport_count(&self) -> usize { self.viewports.len() }

    /// Text dump of the lineage with the values this grid has loaded.
    pub fn trace(&self) -> String {
        format_trace(&self.structure, &self.cache)
    }

    pub fn create_viewport(&mut self, viewport_id: &str, callback_id: &str, definition: ViewportDefinition) -> GridResult<u64> {
        if self.viewports.contains_key(viewport_id) {
            return Err(GridError::DuplicateViewport(viewport_id.to_string()));
        }
        let viewport = DependencyGraphViewport::new(callback_id, definition, &self.structure, &mut self.cache, self.cycle.as_ref())?;
        let version = viewport.viewport().version();
        self.viewports.insert(viewport_id.to_string(), viewport);
        Ok(version)
    }

    pub fn update_viewport(&mut self, viewport_id: &str, definition: ViewportDefinition) -> GridResult<u64> {
        let viewport = self
            .viewports
            .get_mut(viewport_id)
            .ok_or_else(|| GridError::ViewportNotFound(viewport_id.to_string()))?;
        viewport.update(definition, &self.structure, &mut self.cache, self.cycle.as_ref())
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
            .map(|v| v.viewport().results())
            .ok_or_else(|| GridError::ViewportNotFound(viewport_id.to_string()))
    }

    /// Switches to `cycle`, queries it once for every visible specification
    /// and re-renders. Returns the callback ids of viewports whose data changed.
    pub fn update_results(&mut self, cycle: Arc<dyn CycleHandle>) -> Vec<String> {
        self.cycle = cycle;

        let mut seen = HashSet::new();
        let specs: Vec<ValueSpecification> = self
            .viewports
            .values()
            .flat_map(|v| v.visible_specifications(&self.structure))
            .filter(|spec| seen.insert(spec.clone()))
            .collect();
        load(&self.structure, &mut self.cache, self.cycle.as_ref(), &specs);

        let structure = &self.structure;
        let cache = &self.cache;
        self.viewports
            .values_mut()
            .filter_map(|v| v.refresh(structure, cache).then(|| v.viewport().callback_id().to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EmptyCycle, SnapshotCycle, Value, ValueKind};
    use crate::structure::depgraph::{TARGET_COL, VALUE_COL};
    use crate::structure::GridStructure;
    use crate::testing;
    use crate::viewport::ViewportCell;

    fn open() -> DependencyGraphGrid {
        let definition = testing::book_definition();
        let lineage = &definition.configuration("Default").unwrap().lineage;
        DependencyGraphGrid::open("dg-structure", &testing::pv_spec("pos1"), "Default", lineage, &testing::config(), Arc::new(EmptyCycle))
    }

    #[test]
    fn test_viewport_lifecycle() {
        let mut grid = open();
        let rows = grid.structure().row_count();
        assert_eq!(grid.create_viewport("vp", "vp-cb", ViewportDefinition::full(rows, 6)).unwrap(), 1);
        assert_eq!(
            grid.create_viewport("vp", "vp-cb", ViewportDefinition::full(rows, 6)),
            Err(GridError::DuplicateViewport("vp".into()))
        );
        assert!(grid.update_viewport("vp", ViewportDefinition::new(vec![0], vec![VALUE_COL], false)).unwrap() > 1);
        grid.delete_viewport("vp").unwrap();
        assert_eq!(grid.data("vp"), Err(GridError::ViewportNotFound("vp".into())));
        assert_eq!(grid.delete_viewport("vp"), Err(GridError::ViewportNotFound("vp".into())));
    }

    #[test]
    fn test_new_cycle_requeries_and_keeps_history() {
        let mut grid = open();
        grid.create_viewport("vp", "vp-cb", ViewportDefinition::new(vec![0, 2], vec![TARGET_COL, VALUE_COL], false)).unwrap();

        let first = SnapshotCycle::new(&testing::book_cycle(1, 100.0, 200.0));
        assert_eq!(grid.update_results(Arc::new(first)), vec!["vp-cb".to_string()]);
        let second = SnapshotCycle::new(&testing::book_cycle(2, 110.0, 200.0));
        assert_eq!(grid.update_results(Arc::new(second)), vec!["vp-cb".to_string()]);

        let data = grid.data("vp").unwrap();
        match data.cell(0, 1) {
            Some(ViewportCell::Value { value, history, updated }) => {
                assert_eq!(value, &Value::Double(110.0));
                assert_eq!(history.as_deref(), Some(&[Value::Double(100.0), Value::Double(110.0)][..]));
                assert!(updated);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_viewport_changes_within_a_cycle_record_history_once() {
        let definition = testing::book_definition();
        let lineage = &definition.configuration("Default").unwrap().lineage;
        let cycle = SnapshotCycle::new(&testing::book_cycle(1, 100.0, 200.0));
        let mut grid =
            DependencyGraphGrid::open("dg-structure", &testing::pv_spec("pos1"), "Default", lineage, &testing::config(), Arc::new(cycle));

        let value_only = || ViewportDefinition::new(vec![0], vec![VALUE_COL], false);
        grid.create_viewport("a", "a-cb", value_only()).unwrap();
        grid.create_viewport("b", "b-cb", value_only()).unwrap();
        grid.update_viewport("a", ViewportDefinition::new(vec![0], vec![TARGET_COL, VALUE_COL], false)).unwrap();

        let item = grid.cache().get("Default", &testing::pv_spec("pos1"), ValueKind::Double);
        assert_eq!(item.history().map(|h| h.len()), Some(1));
        match grid.data("a").unwrap().cell(0, 1) {
            Some(ViewportCell::Value { history, .. }) => assert_eq!(history.as_deref(), Some(&[Value::Double(100.0)][..])),
            other => panic!("unexpected {:?}", other),
        }
    }
}
