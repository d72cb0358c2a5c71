//! PPTX adapter: one entry per slide, bullets nested below it.

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, instrument};

use crate::domain::{Metadata, OutlineEntry, SourceKind};
use crate::infrastructure::adapters::ooxml::{attr, open_archive, prefixed_attr, read_part, Archive};
use crate::infrastructure::error::{SourceError, SourceResult};
use crate::infrastructure::traits::SourceAdapter;

const PRESENTATION_PART: &str = "ppt/presentation.xml";
const PRESENTATION_RELS_PART: &str = "ppt/_rels/presentation.xml.rels";
const UNTITLED: &str = "Untitled";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideParagraph {
    pub level: u32,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideShape {
    pub is_title: bool,
    pub paragraphs: Vec<SlideParagraph>,
}

impl SlideShape {
    fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Default)]
pub struct PptxAdapter;

impl PptxAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl SourceAdapter for PptxAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Pptx
    }

    #[instrument(level = "debug", skip_all)]
    fn extract(&self, bytes: &[u8]) -> SourceResult<Vec<OutlineEntry>> {
        let mut archive = open_archive(bytes)?;
        let slides = slide_parts(&mut archive)?;
        debug!(slides = slides.len(), "pptx slide order resolved");

        let mut entries = Vec::new();
        for (slide, part) in (1u32..).zip(slides.iter()) {
            let Some(xml) = read_part(&mut archive, part)? else {
                debug!(part = %part, "slide part missing, skipping");
                continue;
            };
            let shapes = parse_shapes(&xml).map_err(|e| SourceError::xml(part, e))?;
            entries.extend(slide_entries(slide, &shapes));
        }
        Ok(entries)
    }
}

/// Entries for one slide: the `Slide N: title` entry at level 1, then each
/// non-empty paragraph that is not the title at paragraph level + 2.
pub fn slide_entries(slide: u32, shapes: &[SlideShape]) -> Vec<OutlineEntry> {
    let title = slide_title(shapes);
    let mut entries = vec![OutlineEntry::new(
        1,
        format!("Slide {}: {}", slide, title.as_deref().unwrap_or(UNTITLED)),
        Metadata::PptxTitle { slide },
    )];

    for paragraph in shapes.iter().flat_map(|s| &s.paragraphs) {
        let text = paragraph.text.trim();
        if text.is_empty() || Some(text) == title.as_deref() {
            continue;
        }
        entries.push(OutlineEntry::new(
            i64::from(paragraph.level) + 2,
            text,
            Metadata::PptxBullet {
                slide,
                indent: paragraph.level,
            },
        ));
    }
    entries
}

/// Title placeholder text, else the first line of the first shape with text.
fn slide_title(shapes: &[SlideShape]) -> Option<String> {
    shapes
        .iter()
        .find(|s| s.is_title)
        .map(SlideShape::text)
        .filter(|t| !t.is_empty())
        .or_else(|| {
            shapes
                .iter()
                .flat_map(|s| &s.paragraphs)
                .map(|p| p.text.trim())
                .find(|t| !t.is_empty())
                .map(str::to_string)
        })
}

/// Slide part names in presentation order.
///
/// Follows `p:sldIdLst` through the presentation relationships; archives
/// without them fall back to `ppt/slides/slideN.xml` sorted by N.
fn slide_parts(archive: &mut Archive<'_>) -> SourceResult<Vec<String>> {
    let presentation = read_part(archive, PRESENTATION_PART)?;
    let rels = read_part(archive, PRESENTATION_RELS_PART)?;

    if let (Some(presentation), Some(rels)) = (presentation, rels) {
        let ids = parse_slide_ids(&presentation).map_err(|e| SourceError::xml(PRESENTATION_PART, e))?;
        let targets =
            parse_relationships(&rels).map_err(|e| SourceError::xml(PRESENTATION_RELS_PART, e))?;
        let parts: Vec<String> = ids
            .iter()
            .filter_map(|id| targets.get(id))
            .map(|target| resolve_target(target))
            .collect();
        if !parts.is_empty() {
            return Ok(parts);
        }
    }

    let mut numbered: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| {
            let n = name
                .strip_prefix("ppt/slides/slide")?
                .strip_suffix(".xml")?
                .parse()
                .ok()?;
            Some((n, name.to_string()))
        })
        .collect();
    numbered.sort();
    Ok(numbered.into_iter().map(|(_, name)| name).collect())
}

fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("ppt/{}", target.trim_start_matches("./")),
    }
}

fn parse_slide_ids(xml: &str) -> Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut ids = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sldId" => {
                if let Some(id) = prefixed_attr(&e, b"id") {
                    ids.push(id);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(ids)
}

fn parse_relationships(xml: &str) -> Result<HashMap<String, String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut targets = HashMap::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                if let (Some(id), Some(target)) = (attr(&e, b"Id"), attr(&e, b"Target")) {
                    targets.insert(id, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(targets)
}

/// Text shapes of a slide, including shapes inside groups.
pub fn parse_shapes(xml: &str) -> Result<Vec<SlideShape>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut shapes = Vec::new();
    let mut shape: Option<SlideShape> = None;
    let mut paragraph: Option<SlideParagraph> = None;
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"sp" => shape = Some(SlideShape::default()),
                b"p" if shape.is_some() => paragraph = Some(SlideParagraph::default()),
                b"pPr" => set_paragraph_level(&mut paragraph, &e),
                b"ph" => mark_title(&mut shape, &e),
                b"t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"pPr" => set_paragraph_level(&mut paragraph, &e),
                b"ph" => mark_title(&mut shape, &e),
                b"br" => {
                    if let Some(p) = paragraph.as_mut() {
                        p.text.push(' ');
                    }
                }
                _ => {}
            },
            Event::Text(t) if in_text => {
                if let Some(p) = paragraph.as_mut() {
                    p.text.push_str(&t.unescape()?);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    if let (Some(s), Some(p)) = (shape.as_mut(), paragraph.take()) {
                        s.paragraphs.push(p);
                    }
                }
                b"sp" => shapes.extend(shape.take()),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(shapes)
}

fn set_paragraph_level(paragraph: &mut Option<SlideParagraph>, e: &quick_xml::events::BytesStart<'_>) {
    if let Some(p) = paragraph.as_mut() {
        p.level = attr(e, b"lvl").and_then(|v| v.parse().ok()).unwrap_or(0);
    }
}

fn mark_title(shape: &mut Option<SlideShape>, e: &quick_xml::events::BytesStart<'_>) {
    if let Some(s) = shape.as_mut() {
        s.is_title = matches!(attr(e, b"type").as_deref(), Some("title" | "ctrTitle"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(is_title: bool, paragraphs: &[(u32, &str)]) -> SlideShape {
        SlideShape {
            is_title,
            paragraphs: paragraphs
                .iter()
                .map(|(level, text)| SlideParagraph {
                    level: *level,
                    text: text.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn given_slide_with_title_and_bullets_when_building_entries_then_nests_bullets() {
        let shapes = vec![
            shape(true, &[(0, "Roadmap")]),
            shape(false, &[(0, "Q1"), (1, "Hiring"), (0, "")]),
        ];

        let entries = slide_entries(2, &shapes);

        let levels: Vec<_> = entries.iter().map(|e| (e.level, e.title.as_str())).collect();
        assert_eq!(levels, vec![(1, "Slide 2: Roadmap"), (2, "Q1"), (3, "Hiring")]);
    }

    #[test]
    fn given_slide_without_text_when_building_entries_then_untitled() {
        let entries = slide_entries(1, &[]);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Slide 1: Untitled");
    }

    #[test]
    fn given_slide_xml_when_parsing_shapes_then_reads_title_and_levels() {
        let xml = r#"<p:sld xmlns:p="p" xmlns:a="a"><p:cSld><p:spTree>
            <p:sp><p:nvSpPr><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr>
              <p:txBody><a:p><a:r><a:t>Agenda</a:t></a:r></a:p></p:txBody></p:sp>
            <p:sp><p:txBody>
              <a:p><a:r><a:t>First</a:t></a:r></a:p>
              <a:p><a:pPr lvl="1"/><a:r><a:t>Detail</a:t></a:r></a:p>
            </p:txBody></p:sp>
        </p:spTree></p:cSld></p:sld>"#;

        let shapes = parse_shapes(xml).unwrap();

        assert_eq!(shapes.len(), 2);
        assert!(shapes[0].is_title);
        assert_eq!(shapes[0].text(), "Agenda");
        assert_eq!(shapes[1].paragraphs[1].level, 1);
        assert_eq!(shapes[1].paragraphs[1].text, "Detail");
    }

    #[test]
    fn given_relative_and_absolute_targets_when_resolving_then_prefixes_ppt() {
        assert_eq!(resolve_target("slides/slide1.xml"), "ppt/slides/slide1.xml");
        assert_eq!(resolve_target("/ppt/slides/slide2.xml"), "ppt/slides/slide2.xml");
    }
}
