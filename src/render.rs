use std::fmt::Write;

use crate::models::{ResultNode, Statistic, StatusOrder};

/// Indented plain-text listing of a report tree, one node per line.
pub fn render(root: &ResultNode, order: &StatusOrder) -> String {
    let mut out = String::new();
    write_node(&mut out, root, 0, order);
    out
}

fn write_node(out: &mut String, node: &ResultNode, depth: usize, order: &StatusOrder) {
    let indent = "  ".repeat(depth);
    match node {
        ResultNode::Leaf(case) => {
            let _ = writeln!(
                out,
                "{}{} {} ({}ms)",
                indent,
                case.status.icon(),
                case.name,
                case.time.duration
            );
        }
        ResultNode::Container(group) => {
            let _ = writeln!(
                out,
                "{}▼ {} [{}] ({}ms)",
                indent,
                group.name,
                counts(&group.statistic, order),
                group.time.duration
            );
            for child in &group.children {
                write_node(out, child, depth + 1, order);
            }
        }
    }
}

fn counts(statistic: &Statistic, order: &StatusOrder) -> String {
    let parts: Vec<String> = order
        .iter()
        .filter(|&status| statistic.count(status) > 0)
        .map(|status| format!("{} {}", status, statistic.count(status)))
        .collect();
    if parts.is_empty() {
        "empty".to_string()
    } else {
        parts.join(", ")
    }
}
