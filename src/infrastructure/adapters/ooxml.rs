//! Shared helpers for Office Open XML containers (DOCX, PPTX).

use std::io::{Cursor, Read};

use quick_xml::events::BytesStart;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::infrastructure::error::{SourceError, SourceResult};

pub type Archive<'a> = ZipArchive<Cursor<&'a [u8]>>;

pub fn open_archive(bytes: &[u8]) -> SourceResult<Archive<'_>> {
    Ok(ZipArchive::new(Cursor::new(bytes))?)
}

/// Read an archive part as UTF-8 text; `None` if the part does not exist.
pub fn read_part(archive: &mut Archive<'_>, name: &str) -> SourceResult<Option<String>> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    Ok(Some(content))
}

/// Read a part that must exist.
pub fn require_part(archive: &mut Archive<'_>, name: &str) -> SourceResult<String> {
    read_part(archive, name)?.ok_or_else(|| SourceError::MissingPart(name.to_string()))
}

/// Value of the attribute with the given local name, ignoring namespace prefixes.
pub fn attr(element: &BytesStart<'_>, local_name: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == local_name)
        .and_then(|a| a.unescape_value().ok())
        .map(|v| v.into_owned())
}

/// Value of a namespace-prefixed attribute (e.g. `r:id`), skipping an
/// unprefixed attribute of the same local name.
pub fn prefixed_attr(element: &BytesStart<'_>, local_name: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|a| a.key.prefix().is_some() && a.key.local_name().as_ref() == local_name)
        .and_then(|a| a.unescape_value().ok())
        .map(|v| v.into_owned())
}
