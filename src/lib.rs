//! Location hierarchy resolution over flat, `partOf`-linked location records.
//!
//! ```
//! use loctree::{resolve_location_children, LocationRecord};
//!
//! let locations = vec![
//!     LocationRecord::new("uuid1"),
//!     LocationRecord::new("uuid2").with_parent("uuid1"),
//!     LocationRecord::new("uuid3").with_parent("uuid2"),
//! ];
//! let children = resolve_location_children("uuid1", &locations);
//! assert_eq!(children, vec![locations[1].clone(), locations[2].clone()]);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{resolve_location_children, LocationId, LocationIndex, LocationRecord, Reference};
