//! Format adapters turning source containers into outline entries.

mod docx;
mod ooxml;
mod pdf;
mod pptx;
mod text;

use std::sync::Arc;

use crate::config::ExtractionConfig;
use crate::domain::{DomainResult, LevelInference, SourceKind};
use crate::infrastructure::traits::SourceAdapter;

pub use docx::{parse_paragraphs, parse_style_names, DocxAdapter, DocxParagraph};
pub use pdf::{normalize_bookmarks, PdfAdapter};
pub use pptx::{parse_shapes, slide_entries, PptxAdapter, SlideParagraph, SlideShape};
pub use text::TextAdapter;

/// One adapter per [`SourceKind`].
pub struct AdapterRegistry {
    adapters: Vec<Box<dyn SourceAdapter>>,
}

impl AdapterRegistry {
    /// Registry with the built-in adapters sharing one level inference.
    pub fn new(inference: Arc<LevelInference>, extraction: &ExtractionConfig) -> DomainResult<Self> {
        Ok(Self::with_adapters(vec![
            Box::new(PdfAdapter::new(Arc::clone(&inference), extraction)),
            Box::new(DocxAdapter::new(Arc::clone(&inference), extraction)),
            Box::new(PptxAdapter::new()),
            Box::new(TextAdapter::new(inference)?),
        ]))
    }

    /// Registry with custom adapters; later adapters shadow earlier ones of the same kind.
    pub fn with_adapters(adapters: Vec<Box<dyn SourceAdapter>>) -> Self {
        Self { adapters }
    }

    pub fn get(&self, kind: SourceKind) -> Option<&dyn SourceAdapter> {
        self.adapters
            .iter()
            .rev()
            .find(|a| a.kind() == kind)
            .map(|a| a.as_ref())
    }
}
