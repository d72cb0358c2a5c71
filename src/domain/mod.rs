//! Domain layer: outline entities and the construction/transform engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod graph;
pub mod level;
pub mod transform;

pub use arena::{NodeData, TreeArena, TreeNode};
pub use builder::{TreeBuilder, MAX_LEVEL};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use graph::{project, GraphEdge, GraphNode, OutlineGraph};
pub use level::{Inference, LevelInference};
pub use transform::{collapse_single_chains, truncate, TransformOptions, COLLAPSE_SEPARATOR};
