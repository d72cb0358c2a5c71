//! Domain entities: core data structures

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Title given to the single placeholder entry of a document without structure.
pub const PLACEHOLDER_TITLE: &str = "Document";

/// Kind of container an outline was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Pdf,
    Docx,
    Pptx,
    Text,
}

impl SourceKind {
    /// Classify a path by its extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "pptx" => Some(Self::Pptx),
            "txt" | "md" | "markdown" => Some(Self::Text),
            _ => None,
        }
    }

    /// Sentinel title of the synthetic root node.
    pub fn root_title(self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
            Self::Pptx => "PPTX",
            Self::Text => "TEXT",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.root_title())
    }
}

/// Provenance of an outline node.
///
/// Carried through the pipeline untouched; the core never inspects it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Metadata {
    /// Root node or entries without provenance
    #[default]
    Empty,
    /// Bookmark from the PDF outline tree
    PdfOutline { page: Option<u32> },
    /// Heading-like line from extracted PDF page text
    PdfText { page: u32 },
    /// Paragraph with a heading style or a numbered heading prefix
    DocxHeading { style: String },
    /// Plain paragraph used when a document has no headings
    DocxText,
    /// Slide title line
    PptxTitle { slide: u32 },
    /// Bullet paragraph on a slide
    PptxBullet { slide: u32, indent: u32 },
    /// Markdown ATX heading
    TextHeading { line: usize },
    /// Heading-like line of plain text
    TextLine { line: usize },
    /// Stand-in entry for a document without any extractable structure
    Placeholder { source: SourceKind },
}

/// One observation emitted by a format adapter: `(level, title, metadata)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    /// Depth hint; values below 1 are clamped by the tree builder
    pub level: i64,
    /// Raw title, normalized by the tree builder
    pub title: String,
    pub metadata: Metadata,
}

impl OutlineEntry {
    pub fn new(level: i64, title: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            level,
            title: title.into(),
            metadata,
        }
    }

    /// The single entry used when a source yields nothing.
    pub fn placeholder(source: SourceKind) -> Self {
        Self::new(1, PLACEHOLDER_TITLE, Metadata::Placeholder { source })
    }
}

/// Node of the normalized outline tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineNode {
    pub title: String,
    pub level: u32,
    pub children: Vec<OutlineNode>,
    #[serde(rename = "meta")]
    pub metadata: Metadata,
}

impl OutlineNode {
    /// Create the level-0 root of a tree.
    pub fn root(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            level: 0,
            children: Vec::new(),
            metadata: Metadata::Empty,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Pre-order traversal yielding `(depth, node)`; the root has depth 0.
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![(0, self)] }
    }

    /// Total number of nodes including the root.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Number of node layers; a root-only tree has height 1.
    pub fn height(&self) -> usize {
        self.iter().map(|(depth, _)| depth + 1).max().unwrap_or(0)
    }

    /// Titles of all leaves in document order.
    pub fn leaf_titles(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(_, node)| node.title.as_str())
            .collect()
    }
}

/// Pre-order iterator over an [`OutlineNode`] tree using an explicit stack.
pub struct PreOrder<'a> {
    stack: Vec<(usize, &'a OutlineNode)>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (usize, &'a OutlineNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        // Reverse push keeps children left-to-right
        for child in node.children.iter().rev() {
            self.stack.push((depth + 1, child));
        }
        Some((depth, node))
    }
}

/// Collapse runs of whitespace to single spaces and trim both ends.
pub fn normalize_title(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
