//! Domain-level errors (no external dependencies)

use std::path::PathBuf;
use thiserror::Error;

/// Domain errors represent hierarchy and record violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("location source not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("invalid location record in {path}: {message}")]
    InvalidRecord { path: PathBuf, message: String },

    #[error("invalid reference resource type: {0:?}")]
    InvalidResourceType(String),

    #[error("cycle detected in location hierarchy: {0}")]
    CycleDetected(String),

    #[error("unknown location: {0}")]
    UnknownLocation(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
