//! DOCX adapter: heading-styled and numbered paragraphs.

use std::collections::HashMap;
use std::sync::Arc;

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, warn};

use crate::config::ExtractionConfig;
use crate::domain::{LevelInference, Metadata, OutlineEntry, SourceKind};
use crate::infrastructure::adapters::ooxml::{attr, open_archive, read_part, require_part};
use crate::infrastructure::error::{SourceError, SourceResult};
use crate::infrastructure::traits::SourceAdapter;

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";

/// Paragraph text with its style identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocxParagraph {
    pub style_id: Option<String>,
    pub text: String,
}

pub struct DocxAdapter {
    inference: Arc<LevelInference>,
    max_heading_level: u32,
    fallback_paragraphs: usize,
    fallback_title_chars: usize,
}

impl DocxAdapter {
    pub fn new(inference: Arc<LevelInference>, config: &ExtractionConfig) -> Self {
        Self {
            inference,
            max_heading_level: config.docx_max_heading_level.max(1),
            fallback_paragraphs: config.docx_fallback_paragraphs,
            fallback_title_chars: config.docx_fallback_title_chars,
        }
    }

    fn heading_entries(
        &self,
        paragraphs: &[DocxParagraph],
        style_names: &HashMap<String, String>,
    ) -> Vec<OutlineEntry> {
        let mut entries = Vec::new();
        for paragraph in paragraphs {
            let text = paragraph.text.trim();
            if text.is_empty() {
                continue;
            }
            let style = paragraph
                .style_id
                .as_ref()
                .map(|id| style_names.get(id).cloned().unwrap_or_else(|| id.clone()))
                .unwrap_or_default();

            let level = if is_heading_style(&style) {
                trailing_number(&style).unwrap_or(1)
            } else if self.inference.has_structural_prefix(text) {
                self.inference.infer(text)
            } else {
                continue;
            };

            entries.push(OutlineEntry::new(
                i64::from(level.min(self.max_heading_level)),
                text,
                Metadata::DocxHeading { style },
            ));
        }
        entries
    }

    fn fallback_entries(&self, paragraphs: &[DocxParagraph]) -> Vec<OutlineEntry> {
        paragraphs
            .iter()
            .take(self.fallback_paragraphs)
            .map(|p| p.text.trim())
            .filter(|text| !text.is_empty())
            .map(|text| {
                let title: String = text.chars().take(self.fallback_title_chars).collect();
                OutlineEntry::new(1, title, Metadata::DocxText)
            })
            .collect()
    }
}

impl SourceAdapter for DocxAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Docx
    }

    fn extract(&self, bytes: &[u8]) -> SourceResult<Vec<OutlineEntry>> {
        let mut archive = open_archive(bytes)?;
        let document = require_part(&mut archive, DOCUMENT_PART)?;
        let style_names = match read_part(&mut archive, STYLES_PART)? {
            Some(styles) => parse_style_names(&styles)
                .map_err(|e| SourceError::xml(STYLES_PART, e))?,
            None => HashMap::new(),
        };
        let paragraphs = parse_paragraphs(&document).map_err(|e| SourceError::xml(DOCUMENT_PART, e))?;
        debug!(paragraphs = paragraphs.len(), styles = style_names.len(), "docx parsed");

        let entries = self.heading_entries(&paragraphs, &style_names);
        if !entries.is_empty() {
            return Ok(entries);
        }
        warn!("docx has no headings, using leading paragraphs");
        Ok(self.fallback_entries(&paragraphs))
    }
}

/// Heading styles in English or Japanese Word ("Heading 2", "見出し 2").
fn is_heading_style(style: &str) -> bool {
    style.to_lowercase().starts_with("heading") || style.contains("見出し")
}

fn trailing_number(style: &str) -> Option<u32> {
    let digits: String = style
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    digits.parse().ok()
}

/// Map paragraph style ids to their display names from `word/styles.xml`.
pub fn parse_style_names(xml: &str) -> Result<HashMap<String, String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut names = HashMap::new();
    let mut current_id: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"style" => {
                current_id = attr(&e, b"styleId");
            }
            Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"name" => {
                if let (Some(id), Some(name)) = (current_id.as_ref(), attr(&e, b"val")) {
                    names.insert(id.clone(), name);
                }
            }
            Event::End(e) if e.local_name().as_ref() == b"style" => current_id = None,
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(names)
}

/// Paragraphs of `word/document.xml` in document order.
///
/// Paragraphs nested in text boxes are emitted before the paragraph that
/// anchors them.
pub fn parse_paragraphs(xml: &str) -> Result<Vec<DocxParagraph>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut open: Vec<DocxParagraph> = Vec::new();
    let mut paragraphs = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => open.push(DocxParagraph::default()),
                b"t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"p" => paragraphs.push(DocxParagraph::default()),
                b"pStyle" => {
                    if let Some(paragraph) = open.last_mut() {
                        paragraph.style_id = attr(&e, b"val");
                    }
                }
                b"tab" | b"br" => {
                    if let Some(paragraph) = open.last_mut() {
                        paragraph.text.push(' ');
                    }
                }
                _ => {}
            },
            Event::Text(t) if in_text => {
                if let Some(paragraph) = open.last_mut() {
                    paragraph.text.push_str(&t.unescape()?);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    if let Some(paragraph) = open.pop() {
                        paragraphs.push(paragraph);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(paragraphs)
}
