//! PDF adapter.
//!
//! Bookmarks are preferred. Documents without a usable outline tree are
//! scanned page by page for heading-like lines; documents that yield
//! nothing at all, or cannot be parsed, become a single placeholder entry.

use std::sync::Arc;

use lopdf::Document;
use tracing::{debug, instrument, warn};

use crate::config::ExtractionConfig;
use crate::domain::{LevelInference, Metadata, OutlineEntry, SourceKind};
use crate::infrastructure::error::SourceResult;
use crate::infrastructure::traits::SourceAdapter;

pub struct PdfAdapter {
    inference: Arc<LevelInference>,
    page_limit: usize,
}

impl PdfAdapter {
    pub fn new(inference: Arc<LevelInference>, config: &ExtractionConfig) -> Self {
        Self {
            inference,
            page_limit: config.pdf_page_limit,
        }
    }

    fn bookmark_entries(&self, doc: &Document) -> Vec<OutlineEntry> {
        let toc = match doc.get_toc() {
            Ok(toc) => toc,
            Err(e) => {
                debug!(error = %e, "pdf has no outline");
                return Vec::new();
            }
        };
        let bookmarks: Vec<(usize, String, usize)> = toc
            .toc
            .into_iter()
            .map(|item| (item.level, item.title, item.page))
            .collect();
        normalize_bookmarks(bookmarks)
    }

    fn text_entries(&self, doc: &Document) -> Vec<OutlineEntry> {
        let mut entries = Vec::new();
        for page in doc.get_pages().into_keys().take(self.page_limit) {
            let text = match doc.extract_text(&[page]) {
                Ok(text) => text,
                Err(e) => {
                    debug!(page, error = %e, "skipping unreadable page");
                    continue;
                }
            };
            entries.extend(self.heading_lines(&text, page));
        }
        entries
    }

    /// Heading-like lines of one page's text.
    pub fn heading_lines(&self, text: &str, page: u32) -> Vec<OutlineEntry> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && self.inference.is_heading_candidate(line))
            .map(|line| {
                OutlineEntry::new(
                    i64::from(self.inference.infer(line)),
                    line,
                    Metadata::PdfText { page },
                )
            })
            .collect()
    }
}

impl SourceAdapter for PdfAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Pdf
    }

    #[instrument(level = "debug", skip_all, fields(bytes = bytes.len()))]
    fn extract(&self, bytes: &[u8]) -> SourceResult<Vec<OutlineEntry>> {
        let doc = match Document::load_mem(bytes) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(error = %e, "unreadable pdf, emitting placeholder");
                return Ok(vec![OutlineEntry::placeholder(SourceKind::Pdf)]);
            }
        };

        let entries = self.bookmark_entries(&doc);
        if !entries.is_empty() {
            debug!(bookmarks = entries.len(), "using pdf outline");
            return Ok(entries);
        }

        let entries = self.text_entries(&doc);
        if !entries.is_empty() {
            debug!(lines = entries.len(), "using heading-like page text");
            return Ok(entries);
        }

        warn!("pdf has neither outline nor heading-like text");
        Ok(vec![OutlineEntry::placeholder(SourceKind::Pdf)])
    }
}

/// Shift bookmark levels so the shallowest one sits at level 1.
///
/// Input tuples are `(level, title, page)`; page 0 means unresolved.
pub fn normalize_bookmarks(bookmarks: Vec<(usize, String, usize)>) -> Vec<OutlineEntry> {
    let Some(min_level) = bookmarks.iter().map(|(level, _, _)| *level).min() else {
        return Vec::new();
    };
    bookmarks
        .into_iter()
        .map(|(level, title, page)| {
            let level = i64::try_from(level - min_level).unwrap_or(i64::MAX - 1) + 1;
            let page = u32::try_from(page).ok().filter(|p| *p > 0);
            OutlineEntry::new(level, title, Metadata::PdfOutline { page })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_zero_based_bookmarks_when_normalizing_then_shallowest_is_level_one() {
        let bookmarks = vec![
            (0, "Intro".to_string(), 1),
            (1, "Scope".to_string(), 2),
            (0, "Body".to_string(), 0),
        ];

        let entries = normalize_bookmarks(bookmarks);

        let levels: Vec<_> = entries.iter().map(|e| e.level).collect();
        assert_eq!(levels, vec![1, 2, 1]);
        assert_eq!(entries[2].metadata, Metadata::PdfOutline { page: None });
    }

    #[test]
    fn given_page_text_when_scanning_then_keeps_heading_candidates() {
        let inference = Arc::new(LevelInference::with_defaults().unwrap());
        let adapter = PdfAdapter::new(inference, &ExtractionConfig::default());
        let text = "1.2 Scope\nThis sentence is far too long to be mistaken for a heading line.\n\n";

        let entries = adapter.heading_lines(text, 3);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, 2);
        assert_eq!(entries[0].metadata, Metadata::PdfText { page: 3 });
    }

    #[test]
    fn given_garbage_bytes_when_extracting_then_placeholder() {
        let inference = Arc::new(LevelInference::with_defaults().unwrap());
        let adapter = PdfAdapter::new(inference, &ExtractionConfig::default());

        let entries = adapter.extract(b"not a pdf").unwrap();

        assert_eq!(entries, vec![OutlineEntry::placeholder(SourceKind::Pdf)]);
    }
}
