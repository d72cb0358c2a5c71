//! Plain text and Markdown adapter.

use std::sync::Arc;

use regex::Regex;
use tracing::debug;

use crate::domain::level::compile;
use crate::domain::{DomainResult, LevelInference, Metadata, OutlineEntry, SourceKind};
use crate::infrastructure::error::SourceResult;
use crate::infrastructure::traits::SourceAdapter;

/// Markdown ATX headings when present, otherwise heading-like lines.
pub struct TextAdapter {
    inference: Arc<LevelInference>,
    atx_heading: Regex,
}

impl TextAdapter {
    pub fn new(inference: Arc<LevelInference>) -> DomainResult<Self> {
        Ok(Self {
            inference,
            atx_heading: compile(r"^(#{1,6})\s+(.+?)(?:\s+#+)?\s*$")?,
        })
    }

    fn markdown_headings(&self, text: &str) -> Vec<OutlineEntry> {
        let mut entries = Vec::new();
        let mut in_fence = false;
        for (idx, line) in text.lines().enumerate() {
            let trimmed = line.trim_start();
            if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
                in_fence = !in_fence;
                continue;
            }
            if in_fence {
                continue;
            }
            if let Some(caps) = self.atx_heading.captures(line) {
                let level = caps[1].len() as i64;
                entries.push(OutlineEntry::new(
                    level,
                    &caps[2],
                    Metadata::TextHeading { line: idx + 1 },
                ));
            }
        }
        entries
    }

    fn heading_lines(&self, text: &str) -> Vec<OutlineEntry> {
        text.lines()
            .enumerate()
            .map(|(idx, line)| (idx, line.trim()))
            .filter(|(_, line)| !line.is_empty() && self.inference.is_heading_candidate(line))
            .map(|(idx, line)| {
                OutlineEntry::new(
                    i64::from(self.inference.infer(line)),
                    line,
                    Metadata::TextLine { line: idx + 1 },
                )
            })
            .collect()
    }
}

impl SourceAdapter for TextAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Text
    }

    fn extract(&self, bytes: &[u8]) -> SourceResult<Vec<OutlineEntry>> {
        let text = String::from_utf8_lossy(bytes);

        let entries = self.markdown_headings(&text);
        if !entries.is_empty() {
            debug!(headings = entries.len(), "using markdown headings");
            return Ok(entries);
        }

        let entries = self.heading_lines(&text);
        if entries.is_empty() {
            return Ok(vec![OutlineEntry::placeholder(SourceKind::Text)]);
        }
        Ok(entries)
    }
}
