//! Domain-level errors (no I/O concerns)

use std::path::PathBuf;
use thiserror::Error;

/// Domain errors represent invalid inputs to the outline core.
///
/// Tree building and transforms have no failure path; these errors only
/// arise when configuring level inference or classifying a source.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid level pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("unsupported source type: {0}")]
    UnsupportedSource(PathBuf),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
