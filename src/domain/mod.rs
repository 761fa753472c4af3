//! Domain layer: entities and hierarchy logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod index;

pub use arena::{LocationTree, TreeNode};
pub use builder::TreeBuilder;
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use index::{resolve_location_children, LocationIndex};
