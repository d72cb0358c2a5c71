//! rsoutline: hierarchical outlines and graphs from documents
//!
//! Layers:
//! - `domain`: level inference, tree building, transforms, graph projection
//! - `application`: outline service and exporters
//! - `infrastructure`: format adapters, filesystem, service wiring
//! - `cli`: argument parsing and command handlers

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
