//! CLI-level errors (wraps application errors)

use std::path::Path;

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{failed} of {total} inputs failed")]
    BatchFailed { failed: usize, total: usize },

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn write_failed(path: &Path, source: std::io::Error) -> Self {
        Self::io(format!("write {}", path.display()), source)
    }

    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Io { .. } => crate::exitcode::IOERR,
            CliError::BatchFailed { .. } => crate::exitcode::PARTIAL,
            CliError::Application(e) => match e {
                ApplicationError::Domain(DomainError::UnsupportedSource(_)) => crate::exitcode::NOINPUT,
                ApplicationError::Domain(DomainError::InvalidPattern { .. }) => crate::exitcode::CONFIG,
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::MalformedSource { .. } => crate::exitcode::DATAERR,
                ApplicationError::OperationFailed { source, .. } if source.is::<std::io::Error>() => {
                    crate::exitcode::IOERR
                }
                ApplicationError::OperationFailed { .. } => crate::exitcode::SOFTWARE,
            },
        }
    }
}
