//! Tree builder turning a flat sequence of outline entries into a tree.

use generational_arena::Index;
use tracing::{debug, trace};

use crate::domain::arena::{NodeData, TreeArena};
use crate::domain::entities::{normalize_title, Metadata, OutlineEntry, OutlineNode};

/// Deepest level a node can get; deeper entries are attached at this level.
///
/// Bounds the height of every built tree, which keeps the recursive
/// transforms, exports and the derived `Clone`/`Drop` within the stack.
pub const MAX_LEVEL: u32 = 64;

/// Constructs an outline tree from entries in document order.
///
/// Keeps a stack of open ancestors; each entry pops every ancestor whose
/// level is not strictly lower, then attaches to the remaining top. Equal
/// levels therefore become siblings, and a deeper entry after a gap (level 1
/// followed by level 3) simply becomes a child. Levels are clamped to
/// `1..=MAX_LEVEL`.
pub struct TreeBuilder {
    tree: TreeArena,
    stack: Vec<(Index, u32)>,
    root_title: String,
    skipped: usize,
}

impl TreeBuilder {
    /// Start a tree whose level-0 root carries `root_title`.
    pub fn new(root_title: &str) -> Self {
        let mut tree = TreeArena::new();
        let root = tree.insert_node(
            NodeData {
                title: root_title.to_string(),
                level: 0,
                metadata: Metadata::Empty,
            },
            None,
        );
        Self {
            tree,
            stack: vec![(root, 0)],
            root_title: root_title.to_string(),
            skipped: 0,
        }
    }

    /// Build a tree from all entries in one pass.
    pub fn build_from<I>(root_title: &str, entries: I) -> OutlineNode
    where
        I: IntoIterator<Item = OutlineEntry>,
    {
        let mut builder = Self::new(root_title);
        for entry in entries {
            builder.push(entry);
        }
        builder.build()
    }

    /// Attach one entry; entries with an empty normalized title are skipped.
    pub fn push(&mut self, entry: OutlineEntry) {
        let title = normalize_title(&entry.title);
        if title.is_empty() {
            self.skipped += 1;
            return;
        }
        let level = clamp_level(entry.level);

        // The root (level 0) is never popped: every level is ≥ 1.
        while let Some(&(_, top_level)) = self.stack.last() {
            if top_level < level {
                break;
            }
            self.stack.pop();
        }
        let parent = self.stack.last().map(|&(idx, _)| idx);

        trace!(level, title = %title, "attach entry");
        let idx = self.tree.insert_node(
            NodeData {
                title,
                level,
                metadata: entry.metadata,
            },
            parent,
        );
        self.stack.push((idx, level));
    }

    /// Finish construction and hand out the owned tree.
    pub fn build(self) -> OutlineNode {
        debug!(
            nodes = self.tree.len(),
            skipped = self.skipped,
            "outline tree built"
        );
        let root_title = self.root_title;
        self.tree
            .into_tree()
            .unwrap_or_else(|| OutlineNode::root(root_title))
    }
}

fn clamp_level(level: i64) -> u32 {
    u32::try_from(level.clamp(1, i64::from(MAX_LEVEL))).unwrap_or(MAX_LEVEL)
}
