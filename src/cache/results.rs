//! results.rs
//! Latest value and bounded history per (configuration, value specification).

use super::history::History;
use crate::config::GridConfig;
use crate::engine::{ComputationFailure, CycleId, QueryResult, Value, ValueKind, ValueSpecification, ViewCycleResult};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub calc_config: String,
    pub specification: ValueSpecification,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheItem {
    latest: Option<Result<Value, ComputationFailure>>,
    history: Option<History>,
    /// Cycle the latest outcome came from.
    cycle: Option<CycleId>,
    /// Update sequence of the last write to this item. Zero for the sentinels.
    last_updated: u64,
}

static EMPTY: CacheItem = CacheItem { latest: None, history: None, cycle: None, last_updated: 0 };
static EMPTY_WITH_HISTORY: CacheItem =
    CacheItem { latest: None, history: Some(History::empty()), cycle: None, last_updated: 0 };

impl CacheItem {
    pub fn latest(&self) -> Option<&Result<Value, ComputationFailure>> {
        self.latest.as_ref()
    }

    pub fn value(&self) -> Option<&Value> {
        self.latest.as_ref()?.as_ref().ok()
    }

    /// `Some` for history-worthy entries, even when no value has arrived yet.
    pub fn history(&self) -> Option<&History> {
        self.history.as_ref()
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.latest, Some(Err(_)))
    }

    pub fn cycle(&self) -> Option<CycleId> {
        self.cycle
    }
}

#[derive(Debug, Clone)]
pub struct ResultsCache {
    entries: HashMap<CacheKey, CacheItem>,
    history_capacity: usize,
    /// Static kind per value name; names missing here fall back to the
    /// kind of the first value that arrives.
    value_kinds: HashMap<String, ValueKind>,
    update_seq: u64,
}

impl ResultsCache {
    pub fn new(history_capacity: usize) -> Self {
        Self { entries: HashMap::new(), history_capacity, value_kinds: HashMap::new(), update_seq: 0 }
    }

    pub fn for_config(config: &GridConfig) -> Self {
        Self { value_kinds: config.value_kinds.clone(), ..Self::new(config.history_capacity) }
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Ingests a full cycle snapshot.
    pub fn put(&mut self, result: &ViewCycleResult) {
        self.update_seq += 1;
        for (calc_config, values) in &result.values {
            for value in values {
                self.insert(calc_config, &value.specification, value.outcome.clone(), Some(result.cycle_id));
            }
        }
        tracing::debug!(
            cycle = ?result.cycle_id,
            values = result.value_count(),
            entries = self.entries.len(),
            "results cache updated"
        );
    }

    /// Ingests the answer to a point query against one configuration of
    /// `cycle`. Asking the same cycle again refreshes the latest values but
    /// leaves the history alone.
    pub fn put_query(&mut self, calc_config: &str, cycle: Option<CycleId>, values: QueryResult) {
        self.update_seq += 1;
        for (spec, outcome) in values {
            self.insert(calc_config, &spec, outcome, cycle);
        }
    }

    fn keeps_history(&self, spec: &ValueSpecification, outcome: &Result<Value, ComputationFailure>) -> bool {
        match self.value_kinds.get(&spec.value_name) {
            Some(kind) if *kind != ValueKind::Unknown => kind.is_history_worthy(),
            _ => matches!(outcome, Ok(value) if value.kind().is_history_worthy()),
        }
    }

    fn insert(
        &mut self,
        calc_config: &str,
        spec: &ValueSpecification,
        outcome: Result<Value, ComputationFailure>,
        cycle: Option<CycleId>,
    ) {
        let keeps_history = self.keeps_history(spec, &outcome);
        let capacity = self.history_capacity;
        let seq = self.update_seq;

        let key = CacheKey { calc_config: calc_config.to_string(), specification: spec.clone() };
        let item = self
            .entries
            .entry(key)
            .or_insert(CacheItem { latest: None, history: None, cycle: None, last_updated: 0 });

        if keeps_history && item.history.is_none() {
            item.history = Some(History::empty());
        }
        let new_cycle = cycle.is_none() || item.cycle != cycle;
        if let (true, Ok(value), Some(history)) = (new_cycle, &outcome, item.history.as_mut()) {
            history.push(value.clone(), capacity);
        }
        item.latest = Some(outcome);
        item.cycle = cycle;
        item.last_updated = seq;
    }

    /// Returns the entry for the key, or an empty sentinel matching whether
    /// `kind` keeps history.
    pub fn get(&self, calc_config: &str, spec: &ValueSpecification, kind: ValueKind) -> &CacheItem {
        // Owned key needed for the lookup: CacheKey has no borrowed form.
        let key = CacheKey { calc_config: calc_config.to_string(), specification: spec.clone() };
        match self.entries.get(&key) {
            Some(item) => item,
            None if kind.is_history_worthy() => &EMPTY_WITH_HISTORY,
            None => &EMPTY,
        }
    }

    /// True if the item was written by the most recent update.
    pub fn is_updated(&self, item: &CacheItem) -> bool {
        self.update_seq > 0 && item.last_updated == self.update_seq
    }
}
