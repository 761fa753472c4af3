//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/loctree/loctree.toml`
//! 3. Local config: `<dir>/.loctree.toml` (usually the working directory)
//! 4. Environment variables: `LOCTREE_*` prefix

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::DEFAULT_RESOURCE_TYPE;

/// How query results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `id<TAB>name` per line
    #[default]
    Text,
    /// Pretty-printed JSON records
    Json,
}

/// Unified configuration for loctree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Default location source (file or directory of `*.json`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<PathBuf>,
    /// Resource type expected in `partOf` references
    pub reference_type: String,
    /// Output format
    pub format: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            locations: None,
            reference_type: DEFAULT_RESOURCE_TYPE.to_string(),
            format: OutputFormat::default(),
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub locations: Option<PathBuf>,
    pub reference_type: Option<String>,
    pub format: Option<OutputFormat>,
}

/// Get the XDG config directory for loctree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "loctree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("loctree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".loctree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

/// Expand `~`, `$VAR` and `${VAR}`, leaving the input as is on failure.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Overlay wins field by field where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            locations: overlay
                .locations
                .clone()
                .or_else(|| self.locations.clone()),
            reference_type: overlay
                .reference_type
                .clone()
                .unwrap_or_else(|| self.reference_type.clone()),
            format: overlay.format.unwrap_or(self.format),
        }
    }

    fn expand_paths(&mut self) {
        if let Some(locations) = &self.locations {
            let expanded = expand_env_vars(locations.to_string_lossy().as_ref());
            self.locations = Some(PathBuf::from(expanded));
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.loctree.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply LOCTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("LOCTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("locations") {
            settings.locations = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("reference_type") {
            settings.reference_type = val;
        }
        if let Ok(val) = config.get_string("format") {
            settings.format =
                OutputFormat::from_str(&val, true).map_err(|e| ApplicationError::Config {
                    message: format!("LOCTREE_FORMAT: {}", e),
                })?;
        }

        Ok(settings)
    }

    /// Settings rendered as a TOML config file.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }

    /// Commented template for `config init`.
    pub fn template() -> String {
        format!(
            "# loctree configuration\n\
             \n\
             # Default location source: a JSON file or a directory of *.json files\n\
             # locations = \"~/locations\"\n\
             \n\
             # Resource type expected in partOf references (<type>/<id>)\n\
             reference_type = \"{}\"\n\
             \n\
             # Output format: \"text\" or \"json\"\n\
             format = \"text\"\n",
            DEFAULT_RESOURCE_TYPE
        )
    }
}
