use crate::cache::ResultsCache;
use crate::engine::Value;
use crate::structure::depgraph::DependencyGraphRow;
use crate::structure::{AnalyticsNode, DependencyGraphStructure};
use std::fmt::Write;

/// Renders a dependency graph as an indented text tree, each row annotated
/// with its value from `cache`.
pub fn format_trace(structure: &DependencyGraphStructure, cache: &ResultsCache) -> String {
    let mut tracer = Tracer { structure, cache, output: String::new() };

    match structure.rows().first() {
        Some(root) => {
            let spec = &root.specification;
            let _ = writeln!(
                tracer.output,
                "LINEAGE TRACE for '{}' on {} [{}]:",
                spec.value_name,
                spec.target,
                structure.calc_config()
            );
            let _ = writeln!(tracer.output, "--------------------------------------------------");
            tracer.trace_row(0, structure.root(), 1, "");
        }
        None => {
            let _ = writeln!(tracer.output, "Error: Empty dependency graph");
        }
    }
    tracer.output
}

struct Tracer<'a> {
    structure: &'a DependencyGraphStructure,
    cache: &'a ResultsCache,
    output: String,
}

impl<'a> Tracer<'a> {
    fn trace_row(&mut self, row: usize, node: Option<&AnalyticsNode>, level: usize, prefix: &str) {
        let Some(r) = self.structure.rows().get(row) else { return };
        let line_header = format!(
            "[L{}] {} ({}){}",
            level,
            r.specification.value_name,
            r.specification.target,
            self.format_value(r)
        );
        match &r.function_name {
            Some(function) => {
                let _ = writeln!(self.output, "{}{} = {}", prefix, line_header, function);
            }
            None => {
                let _ = writeln!(self.output, "{}{} -> Input", prefix, line_header);
            }
        }

        if let Some(node) = node {
            let children = direct_children(node);
            let stem = build_child_stem(prefix);
            for (i, &(child_row, child_node)) in children.iter().enumerate() {
                let connector = if i == children.len() - 1 { "`--" } else { "|--" };
                self.trace_row(child_row, child_node, level + 1, &format!("{}{}", stem, connector));
            }
        }
    }

    fn format_value(&self, row: &DependencyGraphRow) -> String {
        let item = self.cache.get(self.structure.calc_config(), &row.specification, row.kind);
        match item.latest() {
            Some(Ok(Value::Double(v))) => format!("[{:.3}]", v),
            Some(Ok(Value::Text(s))) => format!("[{}]", s),
            Some(Ok(Value::Series(s))) => format!("[len={}]", s.len()),
            Some(Ok(Value::Matrix(m))) => format!("[{}x{}]", m.len(), m.first().map_or(0, Vec::len)),
            Some(Ok(Value::Curve(c))) => format!("[{} pts]", c.len()),
            Some(Err(failure)) => format!("[Err: {}]", failure.message),
            None => "[?]".to_string(),
        }
    }
}

/// Rows directly under `node`: a child sub-tree is entered once, through its
/// first row, and its remaining rows are skipped.
fn direct_children(node: &AnalyticsNode) -> Vec<(usize, Option<&AnalyticsNode>)> {
    let mut out = Vec::new();
    let mut nodes = node.children.iter().peekable();
    let mut row = node.start + 1;
    while row <= node.end {
        match nodes.peek().copied() {
            Some(child) if child.start == row => {
                out.push((row, Some(child)));
                row = child.end + 1;
                nodes.next();
            }
            _ => {
                out.push((row, None));
                row += 1;
            }
        }
    }
    out
}

fn build_child_stem(current_prefix: &str) -> String {
    current_prefix.replace("`--", "   ").replace("|--", "|  ")
}
