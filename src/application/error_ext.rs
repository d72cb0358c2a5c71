//! Path context for I/O failures in the outline pipeline

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Attach the failing action and path to an `io::Result`.
///
/// The original `io::Error` stays the source, which the CLI uses to pick
/// the I/O exit code.
pub trait IoResultExt<T> {
    /// ```ignore
    /// self.fs.read(path).with_path_context("read source", path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, path.display()),
            source: Box::new(e),
        })
    }
}
