//! Application services

pub mod location;

pub use location::{LocationService, SOURCE_EXTENSION};
