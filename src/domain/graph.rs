//! Graph projection: an outline tree as a node/edge graph for renderers.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::domain::entities::OutlineNode;

/// Length of the generated node identifiers.
const ID_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub level: u32,
}

/// Directed parent → child edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
}

/// Tree-shaped graph; nodes in pre-order, the root first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutlineGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl OutlineGraph {
    /// Identifier of the root node, `None` for an empty graph.
    pub fn root_id(&self) -> Option<&str> {
        self.nodes.first().map(|node| node.id.as_str())
    }
}

/// Issues short random identifiers, unique within one projection.
struct IdGenerator {
    issued: HashSet<String>,
}

impl IdGenerator {
    fn new() -> Self {
        Self {
            issued: HashSet::new(),
        }
    }

    fn next_id(&mut self) -> String {
        loop {
            let mut id = Uuid::new_v4().simple().to_string();
            id.truncate(ID_LEN);
            if self.issued.insert(id.clone()) {
                return id;
            }
        }
    }
}

/// Project a tree into graph form: one node per outline node, one edge per
/// parent/child link.
///
/// Identifiers are fresh on every call and carry no meaning beyond it.
pub fn project(tree: &OutlineNode) -> OutlineGraph {
    let mut ids = IdGenerator::new();
    let mut graph = OutlineGraph::default();
    let mut stack: Vec<(&OutlineNode, Option<String>)> = vec![(tree, None)];

    while let Some((node, parent_id)) = stack.pop() {
        let id = ids.next_id();
        graph.nodes.push(GraphNode {
            id: id.clone(),
            label: node.title.clone(),
            level: node.level,
        });
        if let Some(source) = parent_id {
            graph.edges.push(GraphEdge {
                source,
                target: id.clone(),
            });
        }
        for child in node.children.iter().rev() {
            stack.push((child, Some(id.clone())));
        }
    }

    debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "outline projected"
    );
    graph
}
