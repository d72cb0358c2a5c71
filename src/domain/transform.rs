//! Structural transforms over outline trees.
//!
//! Both transforms take the tree by reference and return a new tree, so they
//! compose freely. The usual pipeline is truncation followed by collapsing.

use tracing::debug;

use crate::domain::entities::OutlineNode;

/// Separator placed between titles merged by chain collapsing.
pub const COLLAPSE_SEPARATOR: &str = " / ";

/// Options of the transform pipeline applied after tree building.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformOptions {
    /// Deepest depth (root = 0) that keeps children; `None` keeps everything
    pub max_depth: Option<usize>,
    /// Merge single-child pass-through chains into one node
    pub collapse: bool,
}

impl TransformOptions {
    /// Truncate (if a depth is set), then collapse (if enabled).
    pub fn apply(&self, tree: &OutlineNode) -> OutlineNode {
        let truncated = match self.max_depth {
            Some(max_depth) => truncate(tree, max_depth),
            None => tree.clone(),
        };
        let result = if self.collapse {
            collapse_single_chains(&truncated)
        } else {
            truncated
        };
        debug!(
            max_depth = ?self.max_depth,
            collapse = self.collapse,
            nodes_before = tree.node_count(),
            nodes_after = result.node_count(),
            "transforms applied"
        );
        result
    }
}

/// Copy of `tree` where nodes at depth `max_depth` have no children.
///
/// `max_depth = 0` yields a root-only tree. Titles, levels and metadata of
/// the kept nodes are untouched.
pub fn truncate(tree: &OutlineNode, max_depth: usize) -> OutlineNode {
    fn rec(node: &OutlineNode, depth: usize, max_depth: usize) -> OutlineNode {
        let children = if depth >= max_depth {
            Vec::new()
        } else {
            node.children
                .iter()
                .map(|child| rec(child, depth + 1, max_depth))
                .collect()
        };
        OutlineNode {
            title: node.title.clone(),
            level: node.level,
            children,
            metadata: node.metadata.clone(),
        }
    }
    rec(tree, 0, max_depth)
}

/// Merge runs of single-child nodes into one labelled node.
///
/// While a node has exactly one child and that child has children of its
/// own, the child's title is appended to the label and its children are
/// adopted. A single child that is a leaf stays a separate node. The merged
/// node keeps the level and metadata of the first node of the run.
///
/// The root is a sentinel and never absorbs a child; merging starts at its
/// children.
pub fn collapse_single_chains(tree: &OutlineNode) -> OutlineNode {
    OutlineNode {
        title: tree.title.clone(),
        level: tree.level,
        children: tree.children.iter().map(collapse_node).collect(),
        metadata: tree.metadata.clone(),
    }
}

fn collapse_node(node: &OutlineNode) -> OutlineNode {
    let mut label = node.title.clone();
    let mut current = node;
    while let [only] = current.children.as_slice() {
        if only.is_leaf() {
            break;
        }
        label.push_str(COLLAPSE_SEPARATOR);
        label.push_str(&only.title);
        current = only;
    }

    OutlineNode {
        title: label,
        level: node.level,
        children: current.children.iter().map(collapse_node).collect(),
        metadata: node.metadata.clone(),
    }
}
