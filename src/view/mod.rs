//! The per-session facade over the portfolio and primitives grids.
//!
//! All state sits behind one `parking_lot::RwLock`. Anything that can change
//! a structure, a viewport definition or a results cache takes the write
//! lock; structure and data reads share the read lock. A reader therefore
//! never sees a structure from one compile paired with data rendered against
//! another, and a cycle's cache write always precedes the re-renders it
//! triggers within the same critical section.
pub mod listener;
pub mod registry;

pub use listener::{spawn_event_loop, UpdateListener};
pub use registry::ViewManager;

use crate::cache::ResultsCache;
use crate::config::GridConfig;
use crate::display::{structure_payload, viewport_payload};
use crate::engine::{CompiledViewDefinition, CycleHandle, CycleId, EmptyCycle, EngineEvent, ViewCycleResult};
use crate::error::GridResult;
use crate::grid::{GridType, MainGrid};
use crate::structure::{DependencyGraphStructure, GridStructure, MainGridStructure};
use crate::viewport::{ViewportDefinition, ViewportResults};
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug)]
struct ViewState {
    definition: Arc<CompiledViewDefinition>,
    cache: ResultsCache,
    /// Latest completed cycle; `EmptyCycle` until the first one arrives.
    cycle: Arc<dyn CycleHandle>,
    portfolio: MainGrid,
    primitives: MainGrid,
}

impl ViewState {
    fn grid(&self, grid: GridType) -> &MainGrid {
        match grid {
            GridType::Portfolio => &self.portfolio,
            GridType::Primitives => &self.primitives,
        }
    }

    fn grid_and_cache(&mut self, grid: GridType) -> (&mut MainGrid, &ResultsCache) {
        let main = match grid {
            GridType::Portfolio => &mut self.portfolio,
            GridType::Primitives => &mut self.primitives,
        };
        (main, &self.cache)
    }
}

#[derive(Debug)]
pub struct AnalyticsView {
    id: String,
    config: GridConfig,
    state: RwLock<ViewState>,
}

impl AnalyticsView {
    pub fn new(
        id: impl Into<String>,
        portfolio_callback_id: impl Into<String>,
        primitives_callback_id: impl Into<String>,
        config: GridConfig,
    ) -> Self {
        let state = ViewState {
            definition: Arc::new(CompiledViewDefinition::default()),
            cache: ResultsCache::for_config(&config),
            cycle: Arc::new(EmptyCycle),
            portfolio: MainGrid::new(GridType::Portfolio, portfolio_callback_id),
            primitives: MainGrid::new(GridType::Primitives, primitives_callback_id),
        };
        Self { id: id.into(), config, state: RwLock::new(state) }
    }

    pub fn id(&self) -> &str { &self.id }

    pub fn config(&self) -> &GridConfig { &self.config }

    /// Applies one engine event. Returns the callback ids to notify.
    pub fn apply(&self, event: EngineEvent) -> Vec<String> {
        match event {
            EngineEvent::StructureCompiled(definition) => self.update_structure(definition),
            EngineEvent::CycleCompleted { result, cycle } => self.update_results(&result, cycle),
        }
    }

    /// Rebuilds both grid structures from a fresh compile.
    pub fn update_structure(&self, definition: Arc<CompiledViewDefinition>) -> Vec<String> {
        // Structures depend only on the definition and the immutable config,
        // so they are built before taking the lock.
        let portfolio = MainGridStructure::portfolio(&definition, &self.config);
        let primitives = MainGridStructure::primitives(&definition, &self.config);
        let (portfolio_rows, primitive_rows) = (portfolio.row_count(), primitives.row_count());

        let mut guard = self.state.write();
        let state = &mut *guard;
        let mut notify = state.portfolio.update_structure(portfolio, &state.cache);
        notify.extend(state.primitives.update_structure(primitives, &state.cache));
        state.definition = definition;

        tracing::info!(view = %self.id, portfolio_rows, primitive_rows, "view structure rebuilt");
        notify
    }

    /// Ingests a completed cycle and re-renders every viewport.
    pub fn update_results(&self, result: &ViewCycleResult, cycle: Arc<dyn CycleHandle>) -> Vec<String> {
        let mut guard = self.state.write();
        let state = &mut *guard;
        state.cache.put(result);
        state.cycle = Arc::clone(&cycle);

        let mut changed = state.portfolio.update_results(&state.cache, &cycle);
        changed.extend(state.primitives.update_results(&state.cache, &cycle));
        tracing::debug!(view = %self.id, cycle = ?result.cycle_id, changed = changed.len(), "view results updated");
        changed
    }

    /// The latest completed cycle, if any.
    pub fn latest_cycle(&self) -> Option<CycleId> {
        self.state.read().cycle.cycle_id()
    }

    pub fn grid_structure(&self, grid: GridType) -> Arc<MainGridStructure> {
        Arc::clone(self.state.read().grid(grid).structure())
    }

    pub fn grid_structure_payload(&self, grid: GridType) -> serde_json::Value {
        let state = self.state.read();
        let structure = state.grid(grid).structure();
        structure_payload(&**structure, structure.columns(), structure.root())
    }

    pub fn create_viewport(
        &self,
        grid: GridType,
        viewport_id: &str,
        callback_id: &str,
        definition: ViewportDefinition,
    ) -> GridResult<u64> {
        let mut state = self.state.write();
        let (main, cache) = state.grid_and_cache(grid);
        let version = main.create_viewport(viewport_id, callback_id, definition, cache)?;
        tracing::debug!(view = %self.id, %grid, viewport_id, "viewport created");
        Ok(version)
    }

    pub fn update_viewport(&self, grid: GridType, viewport_id: &str, definition: ViewportDefinition) -> GridResult<u64> {
        let mut state = self.state.write();
        let (main, cache) = state.grid_and_cache(grid);
        main.update_viewport(viewport_id, definition, cache)
    }

    pub fn delete_viewport(&self, grid: GridType, viewport_id: &str) -> GridResult<()> {
        self.state.write().grid_and_cache(grid).0.delete_viewport(viewport_id)
    }

    pub fn get_data(&self, grid: GridType, viewport_id: &str) -> GridResult<ViewportResults> {
        self.state.read().grid(grid).data(viewport_id).cloned()
    }

    pub fn get_data_payload(&self, grid: GridType, viewport_id: &str) -> GridResult<serde_json::Value> {
        self.state.read().grid(grid).data(viewport_id).map(viewport_payload)
    }

    /// Opens the lineage of cell (`row`, `col`), valued from the latest cycle.
    pub fn open_dependency_graph(
        &self,
        grid: GridType,
        graph_id: &str,
        callback_id: &str,
        row: usize,
        col: usize,
    ) -> GridResult<()> {
        let mut guard = self.state.write();
        let state = &mut *guard;
        let definition = Arc::clone(&state.definition);
        let cycle = Arc::clone(&state.cycle);
        state.grid_and_cache(grid).0.open_dependency_graph(graph_id, callback_id, row, col, &definition, &self.config, cycle)
    }

    pub fn close_dependency_graph(&self, grid: GridType, graph_id: &str) -> GridResult<()> {
        self.state.write().grid_and_cache(grid).0.close_dependency_graph(graph_id)?;
        tracing::info!(view = %self.id, %grid, graph_id, "dependency graph closed");
        Ok(())
    }

    pub fn dependency_graph_structure(&self, grid: GridType, graph_id: &str) -> GridResult<Arc<DependencyGraphStructure>> {
        self.state.read().grid(grid).dependency_graph(graph_id).map(|g| Arc::clone(g.structure()))
    }

    pub fn dependency_graph_structure_payload(&self, grid: GridType, graph_id: &str) -> GridResult<serde_json::Value> {
        let state = self.state.read();
        let structure = state.grid(grid).dependency_graph(graph_id)?.structure();
        Ok(structure_payload(&**structure, structure.columns(), structure.root()))
    }

    pub fn create_dependency_graph_viewport(
        &self,
        grid: GridType,
        graph_id: &str,
        viewport_id: &str,
        callback_id: &str,
        definition: ViewportDefinition,
    ) -> GridResult<u64> {
        let mut state = self.state.write();
        state.grid_and_cache(grid).0.dependency_graph_mut(graph_id)?.create_viewport(viewport_id, callback_id, definition)
    }

    pub fn update_dependency_graph_viewport(
        &self,
        grid: GridType,
        graph_id: &str,
        viewport_id: &str,
        definition: ViewportDefinition,
    ) -> GridResult<u64> {
        let mut state = self.state.write();
        state.grid_and_cache(grid).0.dependency_graph_mut(graph_id)?.update_viewport(viewport_id, definition)
    }

    pub fn delete_dependency_graph_viewport(&self, grid: GridType, graph_id: &str, viewport_id: &str) -> GridResult<()> {
        let mut state = self.state.write();
        state.grid_and_cache(grid).0.dependency_graph_mut(graph_id)?.delete_viewport(viewport_id)
    }

    pub fn get_dependency_graph_data(&self, grid: GridType, graph_id: &str, viewport_id: &str) -> GridResult<ViewportResults> {
        self.state.read().grid(grid).dependency_graph(graph_id)?.data(viewport_id).cloned()
    }

    pub fn trace_dependency_graph(&self, grid: GridType, graph_id: &str) -> GridResult<String> {
        let state = self.state.read();
        Ok(state.grid(grid).dependency_graph(graph_id)?.trace())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{SnapshotCycle, Value};
    use crate::error::GridError;
    use crate::structure::depgraph::{TARGET_COL, VALUE_COL};
    use crate::testing;
    use crate::viewport::ViewportCell;
    use serde_json::json;

    fn view() -> AnalyticsView {
        AnalyticsView::new("view-1", "portfolio-cb", "primitives-cb", testing::config())
    }

    fn compiled(view: &AnalyticsView, definition: CompiledViewDefinition) -> Vec<String> {
        view.apply(EngineEvent::StructureCompiled(Arc::new(definition)))
    }

    fn completed(view: &AnalyticsView, result: ViewCycleResult) -> Vec<String> {
        let cycle: Arc<dyn CycleHandle> = Arc::new(SnapshotCycle::new(&result));
        view.apply(EngineEvent::CycleCompleted { result: Arc::new(result), cycle })
    }

    #[test]
    fn test_book_scenario_end_to_end() {
        let view = view();
        let notify = compiled(&view, testing::book_definition());
        assert_eq!(notify, vec!["portfolio-cb".to_string(), "primitives-cb".to_string()]);

        let structure = view.grid_structure(GridType::Portfolio);
        assert_eq!((structure.row_count(), structure.column_count()), (3, 2));

        view.create_viewport(GridType::Portfolio, "vp", "vp-cb", ViewportDefinition::full(3, 2)).unwrap();
        assert_eq!(completed(&view, testing::book_cycle(1, 100.0, 200.0)), vec!["vp-cb".to_string()]);

        let data = view.get_data(GridType::Portfolio, "vp").unwrap();
        assert_eq!(data.cell(0, 0).and_then(ViewportCell::value), Some(&Value::Text("Book A".into())));
        assert_eq!(data.cell(0, 1), Some(&ViewportCell::Empty));
        assert_eq!(data.cell(1, 0).and_then(ViewportCell::value), Some(&Value::Text("Pos1".into())));
        assert_eq!(data.cell(1, 1).and_then(ViewportCell::value), Some(&Value::Double(100.0)));
        assert_eq!(data.cell(2, 0).and_then(ViewportCell::value), Some(&Value::Text("Pos2".into())));
        assert_eq!(data.cell(2, 1).and_then(ViewportCell::value), Some(&Value::Double(200.0)));

        let payload = view.get_data_payload(GridType::Portfolio, "vp").unwrap();
        assert_eq!(payload["rows"][1]["cells"][1]["value"], json!(100.0));
        assert_eq!(payload["rows"][0]["cells"][1], json!(null));
        assert_eq!(view.latest_cycle(), Some(CycleId(1)));
    }

    #[test]
    fn test_quiet_cycle_marks_cells_not_updated() {
        let view = view();
        compiled(&view, testing::book_definition());
        view.create_viewport(GridType::Portfolio, "vp", "vp-cb", ViewportDefinition::full(3, 2)).unwrap();
        completed(&view, testing::book_cycle(1, 100.0, 200.0));
        let version = view.get_data(GridType::Portfolio, "vp").unwrap().version;

        assert!(completed(&view, ViewCycleResult::new(CycleId(2))).is_empty());
        let data = view.get_data(GridType::Portfolio, "vp").unwrap();
        assert_eq!(data.version, version);
        assert_eq!(data.cell(1, 1).and_then(ViewportCell::value), Some(&Value::Double(100.0)));
        assert_eq!(data.cell(1, 1).map(ViewportCell::is_updated), Some(false));
        assert_eq!(view.get_data_payload(GridType::Portfolio, "vp").unwrap()["rows"][1]["cells"][1]["updated"], json!(false));
    }

    #[test]
    fn test_renders_empty_before_first_cycle() {
        let view = view();
        compiled(&view, testing::book_definition());
        view.create_viewport(GridType::Portfolio, "vp", "vp-cb", ViewportDefinition::full(3, 2)).unwrap();
        let data = view.get_data(GridType::Portfolio, "vp").unwrap();
        assert!(data.rows.iter().all(|r| r.cells[1] == ViewportCell::Empty));

        view.open_dependency_graph(GridType::Portfolio, "dg", "dg-cb", 1, 1).unwrap();
        view.create_dependency_graph_viewport(GridType::Portfolio, "dg", "dg-vp", "dg-vp-cb", ViewportDefinition::full(5, 6))
            .unwrap();
        let data = view.get_dependency_graph_data(GridType::Portfolio, "dg", "dg-vp").unwrap();
        assert!(data.rows.iter().all(|r| r.cells[VALUE_COL] == ViewportCell::Empty));
        assert_eq!(view.latest_cycle(), None);
    }

    #[test]
    fn test_dependency_graph_follows_latest_cycle() {
        let view = view();
        compiled(&view, testing::book_definition());
        completed(&view, testing::book_cycle(1, 100.0, 200.0));

        view.open_dependency_graph(GridType::Portfolio, "dg", "dg-cb", 1, 1).unwrap();
        let def = ViewportDefinition::new(vec![0, 2], vec![TARGET_COL, VALUE_COL], false);
        view.create_dependency_graph_viewport(GridType::Portfolio, "dg", "dg-vp", "dg-vp-cb", def).unwrap();
        let data = view.get_dependency_graph_data(GridType::Portfolio, "dg", "dg-vp").unwrap();
        assert_eq!(data.cell(0, 1).and_then(ViewportCell::value), Some(&Value::Double(100.0)));
        assert_eq!(data.cell(1, 1).and_then(ViewportCell::value), Some(&Value::Double(0.05)));

        let changed = completed(&view, testing::book_cycle(2, 150.0, 200.0));
        assert!(changed.contains(&"dg-vp-cb".to_string()));
        let data = view.get_dependency_graph_data(GridType::Portfolio, "dg", "dg-vp").unwrap();
        assert_eq!(data.cell(0, 1).and_then(ViewportCell::value), Some(&Value::Double(150.0)));

        let trace = view.trace_dependency_graph(GridType::Portfolio, "dg").unwrap();
        assert!(trace.contains("[L1] PV (pos1)[150.000] = PresentValue"));
    }

    #[test]
    fn test_structure_rebuild_closes_dependency_graphs() {
        let view = view();
        compiled(&view, testing::book_definition());
        view.create_viewport(GridType::Portfolio, "vp", "vp-cb", ViewportDefinition::full(3, 2)).unwrap();
        view.open_dependency_graph(GridType::Portfolio, "dg", "dg-cb", 1, 1).unwrap();

        let notify = compiled(&view, testing::wide_definition());
        assert!(notify.contains(&"dg-cb".to_string()));
        assert!(notify.contains(&"vp-cb".to_string()));
        assert_eq!(
            view.dependency_graph_structure(GridType::Portfolio, "dg").unwrap_err(),
            GridError::DependencyGraphNotFound("dg".into())
        );
        let payload = view.grid_structure_payload(GridType::Portfolio);
        assert_eq!(payload["rowCount"], json!(6));
    }

    #[test]
    fn test_not_found_and_bounds_errors_leave_state_untouched() {
        let view = view();
        compiled(&view, testing::book_definition());
        assert_eq!(
            view.create_viewport(GridType::Portfolio, "vp", "vp-cb", ViewportDefinition::new(vec![3], vec![0], false)),
            Err(GridError::RowOutOfBounds { index: 3, rows: 3 })
        );
        assert_eq!(view.get_data(GridType::Portfolio, "vp"), Err(GridError::ViewportNotFound("vp".into())));
        assert_eq!(
            view.create_dependency_graph_viewport(GridType::Primitives, "dg", "v", "v-cb", ViewportDefinition::full(1, 1)),
            Err(GridError::DependencyGraphNotFound("dg".into()))
        );
        assert_eq!(view.close_dependency_graph(GridType::Portfolio, "dg"), Err(GridError::DependencyGraphNotFound("dg".into())));
    }

    #[test]
    fn test_readers_never_see_torn_structure() {
        let view = view();
        compiled(&view, testing::book_definition());
        view.create_viewport(GridType::Portfolio, "vp", "vp-cb", ViewportDefinition::new(0..3, vec![0, 1], false)).unwrap();

        std::thread::scope(|s| {
            s.spawn(|| {
                for i in 0..200 {
                    let definition = if i % 2 == 0 { testing::wide_definition() } else { testing::book_definition() };
                    compiled(&view, definition);
                    completed(&view, testing::book_cycle(i, i as f64, 0.0));
                }
            });
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..200 {
                        let structure = view.grid_structure(GridType::Portfolio);
                        let shape = (structure.row_count(), structure.column_count());
                        assert!(shape == (3, 2) || shape == (6, 3), "torn structure {:?}", shape);
                        let labels: Vec<_> = structure.rows().iter().map(|r| r.label.as_str()).collect();
                        match shape {
                            (3, _) => assert_eq!(labels, vec!["Book A", "Pos1", "Pos2"]),
                            _ => assert_eq!(labels[0], "Root"),
                        }
                        let data = view.get_data(GridType::Portfolio, "vp").unwrap();
                        assert!(data.rows.iter().all(|r| r.cells.len() == data.columns.len()));
                    }
                });
            }
        });
    }
}
