//! In-memory DOCX/PPTX fixtures and tree helpers shared by integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::ZipWriter;

use rsoutline::domain::{Metadata, OutlineNode};

/// Zip archive holding the given `(part name, content)` pairs.
pub fn zip_archive(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in parts {
        writer.start_file(*name, FileOptions::default()).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// `word/document.xml` with one paragraph per `(style id, text)`.
pub fn docx_document(paragraphs: &[(Option<&str>, &str)]) -> String {
    let body: String = paragraphs
        .iter()
        .map(|(style, text)| {
            let ppr = style
                .map(|s| format!(r#"<w:pPr><w:pStyle w:val="{s}"/></w:pPr>"#))
                .unwrap_or_default();
            format!(r#"<w:p>{ppr}<w:r><w:t>{text}</w:t></w:r></w:p>"#)
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    )
}

/// `word/styles.xml` mapping style ids to display names.
pub fn docx_styles(styles: &[(&str, &str)]) -> String {
    let body: String = styles
        .iter()
        .map(|(id, name)| {
            format!(r#"<w:style w:type="paragraph" w:styleId="{id}"><w:name w:val="{name}"/></w:style>"#)
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">{body}</w:styles>"#
    )
}

/// Complete DOCX with English heading styles.
pub fn docx_bytes(paragraphs: &[(Option<&str>, &str)]) -> Vec<u8> {
    let document = docx_document(paragraphs);
    let styles = docx_styles(&[
        ("Heading1", "heading 1"),
        ("Heading2", "heading 2"),
        ("Heading3", "heading 3"),
        ("Normal", "Normal"),
    ]);
    zip_archive(&[
        ("word/document.xml", &document),
        ("word/styles.xml", &styles),
    ])
}

/// One slide: optional title placeholder, then body paragraphs `(lvl, text)`.
pub fn pptx_slide(title: Option<&str>, body: &[(u32, &str)]) -> String {
    let title_shape = title
        .map(|t| {
            format!(
                r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:txBody><a:bodyPr/><a:p><a:r><a:t>{t}</a:t></a:r></a:p></p:txBody></p:sp>"#
            )
        })
        .unwrap_or_default();
    let paragraphs: String = body
        .iter()
        .map(|(lvl, text)| {
            format!(r#"<a:p><a:pPr lvl="{lvl}"/><a:r><a:t>{text}</a:t></a:r></a:p>"#)
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree>{title_shape}<p:sp><p:nvSpPr><p:cNvPr id="3" name="Body"/><p:cNvSpPr/><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr><p:txBody><a:bodyPr/>{paragraphs}</p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#
    )
}

/// PPTX whose presentation order is given by `order` (slide file numbers).
pub fn pptx_bytes(slides: &[(u32, String)], order: &[u32]) -> Vec<u8> {
    let ids: String = order
        .iter()
        .map(|n| format!(r#"<p:sldId id="{}" r:id="rId{n}"/>"#, 255 + n))
        .collect();
    let presentation = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><p:sldIdLst>{ids}</p:sldIdLst></p:presentation>"#
    );
    let rels_body: String = slides
        .iter()
        .map(|(n, _)| {
            format!(
                r#"<Relationship Id="rId{n}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{n}.xml"/>"#
            )
        })
        .collect();
    let rels = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels_body}</Relationships>"#
    );

    let slide_names: Vec<String> = slides
        .iter()
        .map(|(n, _)| format!("ppt/slides/slide{n}.xml"))
        .collect();
    let mut parts: Vec<(&str, &str)> = vec![
        ("ppt/presentation.xml", &presentation),
        ("ppt/_rels/presentation.xml.rels", &rels),
    ];
    for (name, (_, xml)) in slide_names.iter().zip(slides) {
        parts.push((name, xml));
    }
    zip_archive(&parts)
}

/// Node with the given children and no provenance.
pub fn node(title: &str, level: u32, children: Vec<OutlineNode>) -> OutlineNode {
    OutlineNode {
        title: title.to_string(),
        level,
        children,
        metadata: Metadata::Empty,
    }
}

/// Titles in pre-order, indented by depth: `["ROOT", "  A", "    B"]`.
pub fn shape(tree: &OutlineNode) -> Vec<String> {
    tree.iter()
        .map(|(depth, n)| format!("{}{}", "  ".repeat(depth), n.title))
        .collect()
}
