//! Infrastructure-level errors raised while reading source containers

use thiserror::Error;

/// Failure of a format adapter to read its container.
///
/// Adapters recover from missing structure by falling back to weaker
/// strategies; this error is reserved for containers that cannot be read.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("xml error in {part}: {source}")]
    Xml {
        part: String,
        #[source]
        source: quick_xml::Error,
    },

    #[error("missing document part: {0}")]
    MissingPart(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SourceError {
    /// Wrap an XML error with the archive part it occurred in.
    pub fn xml(part: impl Into<String>, source: quick_xml::Error) -> Self {
        Self::Xml {
            part: part.into(),
            source,
        }
    }
}

/// Result type for adapter operations.
pub type SourceResult<T> = Result<T, SourceError>;
