//! Graphviz DOT rendering of lineage graphs and chains.

use crate::graph::{EdgeKind, GraphEdge, GraphNode, LineageGraph};
use crate::lineage::{LineageChain, Termination};
use crate::LineageIndex;

fn dot_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn node_key(id: impl std::fmt::Display) -> String {
    format!("\"c{id}\"")
}

fn header(out: &mut String, name: &str) {
    out.push_str(&format!("digraph {name} {{\n"));
    out.push_str("  rankdir=TB;\n");
    out.push_str("  node [shape=box, style=rounded, fontname=\"Helvetica\"];\n");
    out.push_str("  edge [fontname=\"Helvetica\", fontsize=10];\n\n");
}

fn node_line(node: &GraphNode, highlight: bool) -> String {
    let mut label = format!("{}\\n{}", dot_escape(&node.name), dot_escape(&node.rank));
    if let Some(org) = &node.organization {
        label.push_str(&format!("\\n{}", dot_escape(org)));
    }
    let mut attrs = vec![format!("label=\"{label}\"")];
    if highlight {
        attrs.push("style=\"rounded,filled\"".to_string());
        attrs.push("fillcolor=\"#fff3c4\"".to_string());
    }
    format!("  {} [{}];\n", node_key(node.id), attrs.join(", "))
}

fn edge_line(edge: &GraphEdge) -> String {
    let mut label = if edge.date.is_known() {
        edge.date.to_string()
    } else {
        String::new()
    };
    if edge.is_sub_conditione {
        if !label.is_empty() {
            label.push(' ');
        }
        label.push_str("(s.c.)");
    }

    let mut attrs = Vec::new();
    if !label.is_empty() {
        attrs.push(format!("label=\"{}\"", dot_escape(&label)));
    }
    match edge.kind {
        EdgeKind::Ordination => {}
        EdgeKind::Consecration => attrs.push("style=bold".to_string()),
        EdgeKind::CoConsecration => attrs.push("style=dashed".to_string()),
    }
    if edge.is_invalid {
        attrs.push("color=\"#c53030\"".to_string());
    } else if edge.is_doubtful() {
        attrs.push("color=\"#a0a0a0\"".to_string());
    }

    let src = node_key(edge.source_id);
    let dst = node_key(edge.target_id);
    if attrs.is_empty() {
        format!("  {src} -> {dst};\n")
    } else {
        format!("  {src} -> {dst} [{}];\n", attrs.join(", "))
    }
}

/// Render the whole graph.
pub fn render_graph_dot(graph: &LineageGraph) -> String {
    let mut out = String::new();
    header(&mut out, "succession");
    for node in &graph.nodes {
        out.push_str(&node_line(node, false));
    }
    out.push('\n');
    for edge in &graph.edges {
        out.push_str(&edge_line(edge));
    }
    out.push_str("}\n");
    out
}

/// Render a single lineage chain, highlighting its target and noting why the
/// walk stopped.
pub fn render_chain_dot(index: &LineageIndex<'_>, chain: &LineageChain) -> String {
    let mut out = String::new();
    header(&mut out, "lineage");
    for node in chain.nodes(index) {
        out.push_str(&node_line(&node, node.id == chain.target));
    }
    out.push('\n');
    for edge in &chain.edges {
        out.push_str(&edge_line(edge));
    }

    let top = chain.path().last().copied().unwrap_or(chain.target);
    let note = match chain.termination {
        Termination::NoOrdainingBishop => "no ordaining bishop on record".to_string(),
        Termination::NoConsecrator => "no consecrator on record".to_string(),
        Termination::MissingClergy { id } => format!("clergy #{id} missing or deleted"),
        Termination::Cycle { at } => format!("cycle back to #{at}"),
        Termination::SelfReference { at } => format!("#{at} recorded as its own source"),
    };
    out.push_str(&format!(
        "\n  end [shape=plaintext, label=\"{}\"];\n  {} -> end [style=dotted, arrowhead=none];\n",
        dot_escape(&note),
        node_key(top)
    ));
    out.push_str("}\n");
    out
}
