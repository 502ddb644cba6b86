//! payload.rs
//! Logical response payloads handed to the transport layer as JSON values.

use crate::engine::Value;
use crate::structure::{AnalyticsNode, GridColumns, GridStructure};
use crate::viewport::{ViewportCell, ViewportResults};
use serde_json::{json, Value as Json};

/// Formats a value for a cell. Summary mode collapses large values to a
/// short description; expanded mode carries the full data.
pub fn format_value(value: &Value, expanded: bool) -> Json {
    match value {
        Value::Double(v) => json!(v),
        Value::Text(s) => json!(s),
        Value::Series(s) if expanded => json!(s.as_slice()),
        Value::Series(s) => json!(format!("Vector ({})", s.len())),
        Value::Matrix(m) if expanded => json!(m.as_slice()),
        Value::Matrix(m) => json!(format!("Matrix ({} x {})", m.len(), m.first().map_or(0, Vec::len))),
        Value::Curve(c) if expanded => json!(c.iter().map(|&(x, y)| [x, y]).collect::<Vec<_>>()),
        Value::Curve(c) => json!(format!("Curve ({} points)", c.len())),
    }
}

pub fn format_cell(cell: &ViewportCell, expanded: bool) -> Json {
    match cell {
        ViewportCell::Value { value, history, updated } => {
            let mut out = json!({ "value": format_value(value, expanded), "updated": updated });
            if let Some(history) = history {
                out["history"] = history.iter().map(|v| format_value(v, expanded)).collect();
            }
            out
        }
        ViewportCell::Empty => Json::Null,
        ViewportCell::Error { message, updated } => json!({ "error": message, "updated": updated }),
    }
}

/// `{ version, rows: [{ index, cells }] }`.
pub fn viewport_payload(results: &ViewportResults) -> Json {
    let rows: Vec<Json> = results
        .rows
        .iter()
        .map(|row| {
            let cells: Vec<Json> = row.cells.iter().map(|c| format_cell(c, results.expanded)).collect();
            json!({ "index": row.index, "cells": cells })
        })
        .collect();
    json!({ "version": results.version, "rows": rows })
}

/// Nested `[start, end, [children...]]`.
pub fn node_payload(node: &AnalyticsNode) -> Json {
    let children: Vec<Json> = node.children.iter().map(node_payload).collect();
    json!([node.start, node.end, children])
}

fn columns_payload(columns: &GridColumns) -> Json {
    let label = columns.label();
    let groups: Vec<Json> = columns
        .groups()
        .iter()
        .map(|group| {
            let metas: Vec<Json> = columns
                .group_columns(group)
                .iter()
                .map(|m| json!({ "header": m.header, "description": m.description }))
                .collect();
            json!({ "name": group.name, "columns": metas })
        })
        .collect();
    json!({
        "label": { "header": label.header, "description": label.description },
        "groups": groups,
    })
}

/// `{ rowCount, columns: { label, groups }, rootNode }`; `rootNode` is null
/// for flat grids.
pub fn structure_payload<S: GridStructure>(structure: &S, columns: &GridColumns, root: Option<&AnalyticsNode>) -> Json {
    json!({
        "rowCount": structure.row_count(),
        "columns": columns_payload(columns),
        "rootNode": root.map_or(Json::Null, node_payload),
    })
}
