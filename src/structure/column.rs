//! column.rs
//! Column keys, metadata and the derived grouping by configuration.

use crate::engine::{ValueKind, ValueProperties};
use std::collections::HashMap;

/// Identity of a value column. Columns are de-duplicated on this key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnKey {
    pub calc_config: String,
    pub value_name: String,
    pub constraints: ValueProperties,
}

impl ColumnKey {
    pub fn new(calc_config: impl Into<String>, value_name: impl Into<String>, constraints: ValueProperties) -> Self {
        Self { calc_config: calc_config.into(), value_name: value_name.into(), constraints }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMeta {
    pub header: String,
    pub description: String,
    pub kind: ValueKind,
    /// `None` for columns not backed by a value requirement (labels, metadata).
    pub key: Option<ColumnKey>,
}

impl ColumnMeta {
    pub fn fixed(header: impl Into<String>, description: impl Into<String>) -> Self {
        Self { header: header.into(), description: description.into(), kind: ValueKind::Text, key: None }
    }

    fn for_key(key: ColumnKey, kind: ValueKind) -> Self {
        let description = if key.constraints.is_empty() {
            key.value_name.clone()
        } else {
            format!("{}\n{}", key.value_name, key.constraints)
        };
        Self { header: key.value_name.clone(), description, kind, key: Some(key) }
    }
}

/// A contiguous run of columns `[start, end)` sharing a group name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnGroup {
    pub name: String,
    pub start: usize,
    pub end: usize,
}

/// Flat column list with the label column at index 0, owned by no group.
#[derive(Debug, Clone, PartialEq)]
pub struct GridColumns {
    columns: Vec<ColumnMeta>,
    groups: Vec<ColumnGroup>,
    index: HashMap<ColumnKey, usize>,
}

impl GridColumns {
    pub fn new(label: ColumnMeta) -> Self {
        Self { columns: vec![label], groups: Vec::new(), index: HashMap::new() }
    }

    /// Assigns the next index to `key` unless it is already mapped.
    pub fn add_value_column(&mut self, key: ColumnKey, kind: ValueKind) -> usize {
        if let Some(&idx) = self.index.get(&key) {
            return idx;
        }
        let group = key.calc_config.clone();
        let idx = self.push(ColumnMeta::for_key(key.clone(), kind), &group);
        self.index.insert(key, idx);
        idx
    }

    /// Appends a column not backed by a key to `group`.
    pub fn add_fixed_column(&mut self, meta: ColumnMeta, group: &str) -> usize {
        self.push(meta, group)
    }

    fn push(&mut self, meta: ColumnMeta, group: &str) -> usize {
        let idx = self.columns.len();
        self.columns.push(meta);
        match self.groups.last_mut() {
            Some(last) if last.name == group => last.end = idx + 1,
            _ => self.groups.push(ColumnGroup { name: group.to_string(), start: idx, end: idx + 1 }),
        }
        idx
    }

    pub fn len(&self) -> usize { self.columns.len() }

    pub fn is_empty(&self) -> bool { self.columns.is_empty() }

    pub fn get(&self, idx: usize) -> Option<&ColumnMeta> { self.columns.get(idx) }

    pub fn label(&self) -> &ColumnMeta { &self.columns[0] }

    pub fn groups(&self) -> &[ColumnGroup] { &self.groups }

    pub fn index_of(&self, key: &ColumnKey) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn group_columns(&self, group: &ColumnGroup) -> &[ColumnMeta] {
        &self.columns[group.start..group.end]
    }
}
