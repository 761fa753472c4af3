//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::LocationService;
use crate::application::ApplicationError;
use crate::config::Settings;
use crate::domain::ReferenceParser;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraResult;

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Settings,

    /// Location loading and hierarchy queries
    pub location_service: LocationService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> InfraResult<Self> {
        let parser =
            ReferenceParser::new(&settings.reference_type).map_err(ApplicationError::from)?;
        let location_service = LocationService::with_parser(fs, parser);

        Ok(Self {
            settings,
            location_service,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_custom_reference_type_when_wiring_then_service_uses_it() {
        let settings = Settings {
            reference_type: "Facility".to_string(),
            ..Settings::default()
        };

        let container = ServiceContainer::new(settings).unwrap();

        assert_eq!(container.location_service.parser().resource_type(), "Facility");
        assert_eq!(container.settings.reference_type, "Facility");
    }

    #[test]
    fn given_invalid_reference_type_when_wiring_then_errors() {
        let settings = Settings {
            reference_type: "Location/x".to_string(),
            ..Settings::default()
        };

        assert!(ServiceContainer::new(settings).is_err());
    }
}
