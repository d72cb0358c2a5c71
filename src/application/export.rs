//! Serializations of outline trees and graphs.
//!
//! Tree exports are pre-order walks: JSON, an indented Markdown outline and
//! OPML (outline exchange XML). Graph renderings feed external viewers:
//! Graphviz DOT, a standalone vis-network HTML page, and plain JSON.

use std::fmt::Write as _;

use quick_xml::escape::escape;
use termtree::Tree;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{OutlineGraph, OutlineNode};

/// Export format of an outline tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Markdown,
    Opml,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
            Self::Opml => "opml",
        }
    }
}

/// Rendering format of an outline graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphFormat {
    Dot,
    Html,
    Json,
}

impl GraphFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Dot => "dot",
            Self::Html => "html",
            Self::Json => "graph.json",
        }
    }
}

/// Serialize a tree; `title` names the document where the format has a slot for it.
pub fn export_tree(tree: &OutlineNode, format: ExportFormat, title: &str) -> ApplicationResult<String> {
    match format {
        ExportFormat::Json => to_json(tree),
        ExportFormat::Markdown => Ok(to_markdown(tree)),
        ExportFormat::Opml => Ok(to_opml(tree, title)),
    }
}

/// Render a graph for an external viewer.
pub fn render_graph(graph: &OutlineGraph, format: GraphFormat, title: &str) -> ApplicationResult<String> {
    match format {
        GraphFormat::Dot => Ok(to_dot(graph, title)),
        GraphFormat::Html => to_html(graph, title),
        GraphFormat::Json => serde_json::to_string_pretty(graph).map_err(json_err),
    }
}

pub fn to_json(tree: &OutlineNode) -> ApplicationResult<String> {
    serde_json::to_string_pretty(tree).map_err(json_err)
}

/// Root as `#` heading, every other node as an indented bullet.
pub fn to_markdown(tree: &OutlineNode) -> String {
    let mut out = String::new();
    for (depth, node) in tree.iter() {
        if depth == 0 {
            let _ = writeln!(out, "# {}", node.title);
            if !node.is_leaf() {
                out.push('\n');
            }
        } else {
            let _ = writeln!(out, "{}- {}", "  ".repeat(depth - 1), node.title);
        }
    }
    out
}

/// OPML 2.0 document; the sentinel root maps to the `<body>` element.
pub fn to_opml(tree: &OutlineNode, title: &str) -> String {
    fn write_outline(out: &mut String, node: &OutlineNode, indent: usize) {
        let pad = "  ".repeat(indent);
        let text = escape(node.title.as_str());
        if node.is_leaf() {
            let _ = writeln!(out, "{pad}<outline text=\"{text}\"/>");
        } else {
            let _ = writeln!(out, "{pad}<outline text=\"{text}\">");
            for child in &node.children {
                write_outline(out, child, indent + 1);
            }
            let _ = writeln!(out, "{pad}</outline>");
        }
    }

    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<opml version=\"2.0\">\n");
    let _ = writeln!(out, "  <head>\n    <title>{}</title>\n  </head>", escape(title));
    out.push_str("  <body>\n");
    for child in &tree.children {
        write_outline(&mut out, child, 2);
    }
    out.push_str("  </body>\n</opml>\n");
    out
}

/// Conversion into a printable terminal tree.
pub trait ToTermTree {
    fn to_term_tree(&self) -> Tree<String>;
}

impl ToTermTree for OutlineNode {
    fn to_term_tree(&self) -> Tree<String> {
        let leaves: Vec<_> = self.children.iter().map(|c| c.to_term_tree()).collect();
        Tree::new(self.title.clone()).with_leaves(leaves)
    }
}

pub fn to_dot(graph: &OutlineGraph, title: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "// {}", title.replace('\n', " "));
    out.push_str("digraph outline {\n");
    out.push_str(
        "  node [shape=box, style=\"rounded,filled\", color=lightblue2, fontname=\"Noto Sans CJK JP\"];\n",
    );
    for node in &graph.nodes {
        let _ = writeln!(out, "  \"{}\" [label=\"{}\"];", node.id, dot_escape(&node.label));
    }
    for edge in &graph.edges {
        let _ = writeln!(out, "  \"{}\" -> \"{}\";", edge.source, edge.target);
    }
    out.push_str("}\n");
    out
}

const HTML_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<script src="https://unpkg.com/vis-network/standalone/umd/vis-network.min.js"></script>
<style>#network { width: 100%; height: 700px; border: 1px solid #ddd; }</style>
"#;

const HTML_SCRIPT: &str = r#"const nodes = new vis.DataSet(data.nodes.map(n => ({ id: n.id, label: n.label, level: n.level, shape: "box" })));
const edges = new vis.DataSet(data.edges.map(e => ({ from: e.source, to: e.target, arrows: "to" })));
new vis.Network(document.getElementById("network"), { nodes, edges }, {
  layout: { hierarchical: { direction: "UD", sortMethod: "directed" } },
  physics: false
});
"#;

/// Standalone interactive page; the graph is embedded as JSON.
pub fn to_html(graph: &OutlineGraph, title: &str) -> ApplicationResult<String> {
    let data = serde_json::to_string(graph)
        .map_err(json_err)?
        .replace("</", "<\\/");

    let mut out = String::from(HTML_HEAD);
    let _ = writeln!(out, "<title>{}</title>", escape(title));
    out.push_str("</head>\n<body>\n<div id=\"network\"></div>\n<script>\n");
    let _ = writeln!(out, "const data = {data};");
    out.push_str(HTML_SCRIPT);
    out.push_str("</script>\n</body>\n</html>\n");
    Ok(out)
}

fn dot_escape(label: &str) -> String {
    label
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn json_err(e: serde_json::Error) -> ApplicationError {
    ApplicationError::OperationFailed {
        context: "serialize json".to_string(),
        source: Box::new(e),
    }
}
