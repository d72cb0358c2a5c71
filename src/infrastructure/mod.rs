//! Infrastructure layer: I/O implementations, format adapters and DI container
//!
//! This layer implements I/O boundary traits and wires up services.

pub mod adapters;
pub mod di;
pub mod error;
pub mod traits;

pub use error::{SourceError, SourceResult};
