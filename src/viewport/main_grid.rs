//! main_grid.rs
//! A versioned window over a grid, rendered from a shared results cache.

use super::cell::{render, ViewportResults};
use super::definition::ViewportDefinition;
use crate::cache::ResultsCache;
use crate::error::GridResult;
use crate::structure::GridStructure;

pub const INITIAL_VERSION: u64 = 1;

#[derive(Debug, Clone)]
pub struct Viewport {
    callback_id: String,
    definition: ViewportDefinition,
    version: u64,
    results: ViewportResults,
}

impl Viewport {
    /// Validates `definition` against `structure`; nothing is created on failure.
    pub fn new<S: GridStructure>(
        callback_id: impl Into<String>,
        definition: ViewportDefinition,
        structure: &S,
        cache: &ResultsCache,
    ) -> GridResult<Self> {
        structure.check_bounds(definition.rows(), definition.columns())?;
        let results = render(structure, cache, &definition, INITIAL_VERSION);
        Ok(Self { callback_id: callback_id.into(), definition, version: INITIAL_VERSION, results })
    }

    /// Replaces the definition and re-renders. On failure the viewport is unchanged.
    pub fn update<S: GridStructure>(
        &mut self,
        definition: ViewportDefinition,
        structure: &S,
        cache: &ResultsCache,
    ) -> GridResult<u64> {
        structure.check_bounds(definition.rows(), definition.columns())?;
        self.definition = definition;
        self.rerender(structure, cache);
        Ok(self.version)
    }

    /// Re-renders after new results arrived. Returns true, and bumps the
    /// version, only if a visible cell was refreshed; otherwise the data is
    /// replaced at the current version so stale `updated` flags clear.
    pub fn refresh<S: GridStructure>(&mut self, structure: &S, cache: &ResultsCache) -> bool {
        let mut results = render(structure, cache, &self.definition, self.version);
        let changed = results.has_updates();
        if changed {
            self.version += 1;
            results.version = self.version;
        }
        self.results = results;
        changed
    }

    /// Drops indices invalidated by a structure rebuild and re-renders.
    pub fn clip<S: GridStructure>(&mut self, structure: &S, cache: &ResultsCache) {
        let clipped = self.definition.clipped(structure.row_count(), structure.column_count());
        if clipped != self.definition {
            tracing::warn!(
                callback_id = %self.callback_id,
                rows = clipped.rows().len(),
                columns = clipped.columns().len(),
                "viewport clipped to new structure"
            );
        }
        self.definition = clipped;
        self.rerender(structure, cache);
    }

    fn rerender<S: GridStructure>(&mut self, structure: &S, cache: &ResultsCache) {
        self.version += 1;
        self.results = render(structure, cache, &self.definition, self.version);
    }

    pub fn callback_id(&self) -> &str { &self.callback_id }

    pub fn definition(&self) -> &ViewportDefinition { &self.definition }

    pub fn version(&self) -> u64 { self.version }

    pub fn results(&self) -> &ViewportResults { &self.results }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{CycleId, Value, ViewCycleResult};
    use crate::error::GridError;
    use crate::structure::MainGridStructure;
    use crate::testing;
    use crate::viewport::ViewportCell;
    use rstest::rstest;

    fn book() -> (MainGridStructure, ResultsCache) {
        let structure = MainGridStructure::portfolio(&testing::book_definition(), &testing::config());
        let mut cache = ResultsCache::new(20);
        cache.put(&testing::book_cycle(1, 100.0, 200.0));
        (structure, cache)
    }

    #[rstest]
    #[case(vec![0, 1, 2], vec![0, 1])]
    #[case(vec![2], vec![1])]
    #[case(vec![], vec![])]
    fn test_in_bounds_viewport_is_created(#[case] rows: Vec<usize>, #[case] cols: Vec<usize>) {
        let (structure, cache) = book();
        let vp = Viewport::new("vp", ViewportDefinition::new(rows.clone(), cols, false), &structure, &cache).unwrap();
        assert_eq!(vp.version(), INITIAL_VERSION);
        assert_eq!(vp.results().rows.len(), rows.len());
    }

    #[rstest]
    #[case(vec![3], vec![0], GridError::RowOutOfBounds { index: 3, rows: 3 })]
    #[case(vec![0], vec![2], GridError::ColumnOutOfBounds { index: 2, columns: 2 })]
    #[case(vec![0, 99], vec![0, 99], GridError::RowOutOfBounds { index: 99, rows: 3 })]
    fn test_out_of_bounds_viewport_is_rejected(#[case] rows: Vec<usize>, #[case] cols: Vec<usize>, #[case] expected: GridError) {
        let (structure, cache) = book();
        let err = Viewport::new("vp", ViewportDefinition::new(rows, cols, false), &structure, &cache).unwrap_err();
        assert_eq!(err, expected);
    }

    #[test]
    fn test_version_increases_on_update_and_not_on_failure() {
        let (structure, cache) = book();
        let mut vp = Viewport::new("vp", ViewportDefinition::full(3, 2), &structure, &cache).unwrap();

        let v2 = vp.update(ViewportDefinition::new(vec![1], vec![1], false), &structure, &cache).unwrap();
        assert!(v2 > INITIAL_VERSION);

        let before = vp.definition().clone();
        assert!(vp.update(ViewportDefinition::new(vec![5], vec![1], false), &structure, &cache).is_err());
        assert_eq!(vp.version(), v2);
        assert_eq!(vp.definition(), &before);

        let v3 = vp.update(ViewportDefinition::full(3, 2), &structure, &cache).unwrap();
        assert!(v3 > v2);
    }

    #[test]
    fn test_refresh_reports_changes_only_for_visible_updates() {
        let (structure, mut cache) = book();
        // Only the label column is visible.
        let mut labels = Viewport::new("labels", ViewportDefinition::new(0..3, vec![0], false), &structure, &cache).unwrap();
        let mut values = Viewport::new("values", ViewportDefinition::full(3, 2), &structure, &cache).unwrap();

        cache.put(&testing::book_cycle(2, 101.0, 201.0));
        assert!(!labels.refresh(&structure, &cache));
        assert_eq!(labels.version(), INITIAL_VERSION);

        assert!(values.refresh(&structure, &cache));
        assert_eq!(values.version(), INITIAL_VERSION + 1);
        assert_eq!(values.results().cell(1, 1).and_then(ViewportCell::value), Some(&Value::Double(101.0)));
    }

    #[test]
    fn test_quiet_cycle_clears_updated_flags_without_bumping_version() {
        let (structure, mut cache) = book();
        let mut vp = Viewport::new("vp", ViewportDefinition::full(3, 2), &structure, &cache).unwrap();
        assert!(vp.results().cell(1, 1).is_some_and(ViewportCell::is_updated));

        cache.put(&ViewCycleResult::new(CycleId(2)));
        assert!(!vp.refresh(&structure, &cache));
        assert_eq!(vp.version(), INITIAL_VERSION);
        assert_eq!(vp.results().version, INITIAL_VERSION);
        match vp.results().cell(1, 1) {
            Some(ViewportCell::Value { value, updated, .. }) => {
                assert_eq!(value, &Value::Double(100.0));
                assert!(!updated);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_clip_drops_invalid_indices() {
        let (structure, cache) = book();
        let mut vp = Viewport::new("vp", ViewportDefinition::full(3, 2), &structure, &cache).unwrap();
        vp.clip(&MainGridStructure::empty(), &cache);
        assert!(vp.definition().rows().is_empty());
        assert_eq!(vp.definition().columns(), &[0]);
        assert_eq!(vp.version(), INITIAL_VERSION + 1);
    }
}
