//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Serialize(_) => crate::exitcode::SOFTWARE,
                InfraError::Application(app) => match app {
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::OperationFailed { .. } => crate::exitcode::DATAERR,
                    ApplicationError::Domain(domain) => match domain {
                        DomainError::SourceNotFound(_) => crate::exitcode::NOINPUT,
                        DomainError::UnknownLocation(_) => crate::exitcode::NOINPUT,
                        DomainError::InvalidResourceType(_) => crate::exitcode::CONFIG,
                        DomainError::InvalidRecord { .. } | DomainError::CycleDetected(_) => {
                            crate::exitcode::DATAERR
                        }
                    },
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn given_errors_when_mapping_exit_codes_then_sysexits_values() {
        let missing = CliError::from(ApplicationError::from(DomainError::SourceNotFound(
            PathBuf::from("/nope.json"),
        )));
        let cycle = CliError::from(ApplicationError::from(DomainError::CycleDetected(
            "a".to_string(),
        )));

        assert_eq!(missing.exit_code(), crate::exitcode::NOINPUT);
        assert_eq!(cycle.exit_code(), crate::exitcode::DATAERR);
        assert_eq!(
            CliError::Usage("no source".into()).exit_code(),
            crate::exitcode::USAGE
        );
    }
}
