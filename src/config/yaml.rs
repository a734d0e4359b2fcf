//! YAML settings loading and parsing

use crate::config::Settings;
use crate::error::PanelError;
use crate::system::System;
use anyhow::{Context as _, Result};
use serde_json::Value;
use std::path::Path;

/// Load, schema-check and parse a YAML settings file
pub fn load_settings(system: &dyn System, path: &Path) -> Result<Settings> {
    if !system.exists(path) {
        return Err(PanelError::configuration(format!(
            "Settings file not found: {}\n\
            Create it or point --config at a different file",
            path.display()
        ))
        .into());
    }

    let content = system
        .read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

    parse_settings(&content).map_err(|e| {
        PanelError::configuration(format!("{}: {e:#}", path.display())).into()
    })
}

/// Parse settings from YAML text
///
/// An empty document yields the defaults.
pub fn parse_settings(content: &str) -> Result<Settings> {
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }

    let raw: Value = serde_yaml::from_str(content).context(
        "Failed to parse YAML settings\n\
        Please check the syntax and structure of your settings file",
    )?;

    if raw.is_null() {
        return Ok(Settings::default());
    }

    crate::config::schema::validate_against_schema(&raw)?;

    let settings: Settings =
        serde_json::from_value(raw).context("Failed to read settings values")?;

    settings.validate()?;

    Ok(settings)
}
