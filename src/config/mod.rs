//! Settings management module
//!
//! Handles the optional YAML settings file, JSON schema validation, and
//! command-line overrides

pub mod schema;
pub mod validation;
pub mod yaml;

use crate::error::PanelError;
use crate::system::System;
use crate::view::TimeBuckets;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory name used under the platform config and data directories
pub const APP_DIR: &str = "orgdeck";

/// Panel settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Name or path of the external CLI
    pub cli_path: String,

    /// State file location; the platform data directory when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,

    /// Oldest CLI version that does not trigger a warning
    pub min_cli_version: String,

    /// Default for the "hide disconnected" filter
    pub hide_disconnected: bool,

    /// Skip the startup version check
    pub skip_preflight: bool,

    pub time_buckets: TimeBuckets,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cli_path: "sf".to_owned(),
            state_file: None,
            min_cli_version: "2.0.0".to_owned(),
            hide_disconnected: true,
            skip_preflight: false,
            time_buckets: TimeBuckets::default(),
        }
    }
}

impl Settings {
    /// Load settings from an explicit file
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, malformed or invalid
    pub fn load_from_file(system: &dyn System, path: &Path) -> Result<Self> {
        yaml::load_settings(system, path)
    }

    /// Load from `path` when given, else from the default location if it exists
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing, or any file found is invalid
    pub fn load(system: &dyn System, path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_file(system, path);
        }

        match default_settings_path() {
            Some(path) if system.exists(&path) => Self::load_from_file(system, &path),
            _ => Ok(Self::default()),
        }
    }

    /// Check semantic constraints the schema cannot express
    ///
    /// # Errors
    ///
    /// Returns a configuration error describing the first problem found
    pub fn validate(&self) -> Result<()> {
        validation::validate_settings(self)
    }

    /// Resolve the state file location
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no data directory can be determined
    pub fn state_path(&self) -> Result<PathBuf> {
        if let Some(path) = self.state_file.as_ref() {
            return Ok(path.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR).join("state.json"))
            .ok_or_else(|| {
                PanelError::configuration(
                    "Cannot determine a data directory; set stateFile or --state-file",
                )
                .into()
            })
    }
}

/// `<config dir>/orgdeck/config.yaml`
#[must_use]
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.yaml"))
}
