//! Tests for the DOCX, PPTX and text format adapters using in-memory containers

mod common;

use std::sync::Arc;

use rsoutline::config::ExtractionConfig;
use rsoutline::domain::{LevelInference, Metadata, OutlineEntry, SourceKind};
use rsoutline::infrastructure::adapters::{AdapterRegistry, DocxAdapter, PptxAdapter};
use rsoutline::infrastructure::traits::SourceAdapter;
use rsoutline::infrastructure::SourceError;

use common::{docx_bytes, docx_document, docx_styles, pptx_bytes, pptx_slide, zip_archive};

fn inference() -> Arc<LevelInference> {
    Arc::new(LevelInference::with_defaults().unwrap())
}

fn docx_adapter() -> DocxAdapter {
    DocxAdapter::new(inference(), &ExtractionConfig::default())
}

fn levels(entries: &[OutlineEntry]) -> Vec<(i64, &str)> {
    entries.iter().map(|e| (e.level, e.title.as_str())).collect()
}

// ============================================================
// DOCX
// ============================================================

#[test]
fn given_heading_styles_when_extracting_docx_then_levels_from_style_numbers() {
    // Arrange
    let bytes = docx_bytes(&[
        (Some("Heading1"), "Overview"),
        (Some("Normal"), "Body text that is not part of the outline."),
        (Some("Heading2"), "Goals"),
        (Some("Heading3"), "Metrics"),
        (Some("Heading1"), "Design"),
    ]);

    // Act
    let entries = docx_adapter().extract(&bytes).unwrap();

    // Assert
    assert_eq!(
        levels(&entries),
        vec![(1, "Overview"), (2, "Goals"), (3, "Metrics"), (1, "Design")]
    );
    assert_eq!(
        entries[1].metadata,
        Metadata::DocxHeading {
            style: "heading 2".to_string()
        }
    );
}

#[test]
fn given_japanese_heading_style_when_extracting_docx_then_trailing_digit_is_level() {
    // Arrange
    let document = docx_document(&[(Some("a1"), "概要"), (Some("a2"), "目的")]);
    let styles = docx_styles(&[("a1", "見出し 1"), ("a2", "見出し 2")]);
    let bytes = zip_archive(&[
        ("word/document.xml", &document),
        ("word/styles.xml", &styles),
    ]);

    // Act
    let entries = docx_adapter().extract(&bytes).unwrap();

    // Assert
    assert_eq!(levels(&entries), vec![(1, "概要"), (2, "目的")]);
}

#[test]
fn given_numbered_paragraphs_without_heading_style_when_extracting_docx_then_levels_inferred() {
    let bytes = docx_bytes(&[
        (None, "1. Introduction"),
        (None, "just a sentence in between"),
        (None, "1.1 Background"),
        (Some("Normal"), "Chapter 2 Method"),
    ]);

    let entries = docx_adapter().extract(&bytes).unwrap();

    assert_eq!(
        levels(&entries),
        vec![(1, "1. Introduction"), (2, "1.1 Background"), (1, "Chapter 2 Method")]
    );
}

#[test]
fn given_deep_heading_style_when_extracting_docx_then_capped_at_max_level() {
    let document = docx_document(&[(Some("Heading9"), "Deep")]);
    let styles = docx_styles(&[("Heading9", "heading 9")]);
    let bytes = zip_archive(&[
        ("word/document.xml", &document),
        ("word/styles.xml", &styles),
    ]);

    let entries = docx_adapter().extract(&bytes).unwrap();

    assert_eq!(levels(&entries), vec![(6, "Deep")]);
}

#[test]
fn given_no_headings_when_extracting_docx_then_falls_back_to_truncated_paragraphs() {
    // Arrange
    let long = "x".repeat(80);
    let mut paragraphs: Vec<(Option<&str>, &str)> = vec![(None, long.as_str()), (None, "")];
    paragraphs.extend(std::iter::repeat((None, "plain paragraph")).take(60));
    let bytes = docx_bytes(&paragraphs);

    // Act
    let entries = docx_adapter().extract(&bytes).unwrap();

    // Assert: first 50 paragraphs minus the empty one
    assert_eq!(entries.len(), 49);
    assert_eq!(entries[0].title.chars().count(), 60);
    assert!(entries.iter().all(|e| e.level == 1));
    assert!(entries.iter().all(|e| e.metadata == Metadata::DocxText));
}

#[test]
fn given_docx_without_styles_part_when_extracting_then_uses_style_ids() {
    let document = docx_document(&[(Some("Heading2"), "Only")]);
    let bytes = zip_archive(&[("word/document.xml", &document)]);

    let entries = docx_adapter().extract(&bytes).unwrap();

    assert_eq!(levels(&entries), vec![(2, "Only")]);
}

#[test]
fn given_archive_without_document_part_when_extracting_docx_then_missing_part_error() {
    let bytes = zip_archive(&[("word/styles.xml", "<w:styles/>")]);

    let result = docx_adapter().extract(&bytes);

    assert!(matches!(result, Err(SourceError::MissingPart(part)) if part == "word/document.xml"));
}

#[test]
fn given_non_zip_bytes_when_extracting_docx_then_archive_error() {
    let result = docx_adapter().extract(b"definitely not a zip file");

    assert!(matches!(result, Err(SourceError::Archive(_))));
}

// ============================================================
// PPTX
// ============================================================

#[test]
fn given_presentation_order_when_extracting_pptx_then_follows_slide_id_list() {
    // Arrange: slide files are numbered 1 and 2, presented as 2 then 1
    let slides = vec![
        (1, pptx_slide(Some("Later"), &[(0, "closing")])),
        (2, pptx_slide(Some("First"), &[(0, "Agenda"), (1, "Item"), (0, "First")])),
    ];
    let bytes = pptx_bytes(&slides, &[2, 1]);

    // Act
    let entries = PptxAdapter::new().extract(&bytes).unwrap();

    // Assert
    assert_eq!(
        levels(&entries),
        vec![
            (1, "Slide 1: First"),
            (2, "Agenda"),
            (3, "Item"),
            (1, "Slide 2: Later"),
            (2, "closing"),
        ]
    );
    assert_eq!(entries[2].metadata, Metadata::PptxBullet { slide: 1, indent: 1 });
}

#[test]
fn given_slide_without_title_placeholder_when_extracting_pptx_then_first_line_is_title() {
    let slides = vec![(1, pptx_slide(None, &[(0, "Summary"), (0, "Details")]))];
    let bytes = pptx_bytes(&slides, &[1]);

    let entries = PptxAdapter::new().extract(&bytes).unwrap();

    assert_eq!(levels(&entries), vec![(1, "Slide 1: Summary"), (2, "Details")]);
}

#[test]
fn given_empty_slide_when_extracting_pptx_then_untitled() {
    let slides = vec![(1, pptx_slide(None, &[]))];
    let bytes = pptx_bytes(&slides, &[1]);

    let entries = PptxAdapter::new().extract(&bytes).unwrap();

    assert_eq!(levels(&entries), vec![(1, "Slide 1: Untitled")]);
}

#[test]
fn given_no_presentation_part_when_extracting_pptx_then_numeric_file_order() {
    // Arrange
    let slide2 = pptx_slide(Some("Two"), &[]);
    let slide10 = pptx_slide(Some("Ten"), &[]);
    let bytes = zip_archive(&[
        ("ppt/slides/slide10.xml", &slide10),
        ("ppt/slides/slide2.xml", &slide2),
    ]);

    // Act
    let entries = PptxAdapter::new().extract(&bytes).unwrap();

    // Assert
    assert_eq!(levels(&entries), vec![(1, "Slide 1: Two"), (1, "Slide 2: Ten")]);
}

// ============================================================
// Registry
// ============================================================

#[test]
fn given_registry_when_looking_up_kinds_then_every_kind_has_an_adapter() {
    let registry = AdapterRegistry::new(inference(), &ExtractionConfig::default()).unwrap();

    for kind in [SourceKind::Pdf, SourceKind::Docx, SourceKind::Pptx, SourceKind::Text] {
        let adapter = registry.get(kind).expect("adapter registered");
        assert_eq!(adapter.kind(), kind);
    }
}

#[test]
fn given_text_source_when_extracting_via_registry_then_markdown_levels() {
    let registry = AdapterRegistry::new(inference(), &ExtractionConfig::default()).unwrap();
    let adapter = registry.get(SourceKind::Text).unwrap();

    let entries = adapter.extract(b"# Guide\n\n## Install\ntext\n### Flags\n").unwrap();

    assert_eq!(levels(&entries), vec![(1, "Guide"), (2, "Install"), (3, "Flags")]);
}

#[test]
fn given_empty_office_documents_when_extracting_then_no_entries_and_no_placeholder() {
    let docx = docx_bytes(&[]);
    let pptx = pptx_bytes(&[], &[]);

    let docx_entries = docx_adapter().extract(&docx).unwrap();
    let pptx_entries = PptxAdapter::new().extract(&pptx).unwrap();

    assert!(docx_entries.is_empty());
    assert!(pptx_entries.is_empty());
}
