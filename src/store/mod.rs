//! Persisted panel state
//!
//! Two independent entries live in one JSON file: the cached org list and
//! the last-opened map. A list refresh replaces the former and never
//! touches the latter.

use crate::error::PanelError;
use crate::org::OrgRecord;
use crate::system::System;
use anyhow::{Context as _, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Identifier to RFC 3339 timestamp of the last open
pub type LastOpened = BTreeMap<String, String>;

/// On-disk shape of the state file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_list: Option<Vec<OrgRecord>>,
    #[serde(default)]
    pub last_opened: LastOpened,
}

/// State file handle; every mutation is written through immediately
pub struct StateStore<'sys> {
    system: &'sys dyn System,
    path: PathBuf,
    state: PanelState,
}

impl<'sys> StateStore<'sys> {
    /// Load the state file, starting empty if it does not exist yet
    ///
    /// # Errors
    ///
    /// Returns a `State` error if the file exists but cannot be read or parsed
    pub fn open(system: &'sys dyn System, path: &Path) -> Result<Self> {
        let state = if system.exists(path) {
            let content = system.read_to_string(path).map_err(|e| {
                PanelError::state(format!("Failed to read {}: {e}", path.display()))
            })?;
            if content.trim().is_empty() {
                PanelState::default()
            } else {
                serde_json::from_str(&content).map_err(|e| {
                    PanelError::state(format!(
                        "State file {} is corrupt: {e}\n\
                        Delete it to start over; it will be rebuilt on the next refresh",
                        path.display()
                    ))
                })?
            }
        } else {
            debug!("No state file at {}, starting empty", path.display());
            PanelState::default()
        };

        Ok(Self {
            system,
            path: path.to_path_buf(),
            state,
        })
    }

    /// Cached org list, `None` until the first successful fetch
    #[must_use]
    pub fn org_list(&self) -> Option<&[OrgRecord]> {
        self.state.org_list.as_deref()
    }

    #[must_use]
    pub fn find_org(&self, id: &str) -> Option<&OrgRecord> {
        self.org_list()?.iter().find(|org| org.identifier() == id)
    }

    #[must_use]
    pub const fn last_opened(&self) -> &LastOpened {
        &self.state.last_opened
    }

    /// Replace the whole cached list
    ///
    /// # Errors
    ///
    /// Returns an error if the state file cannot be written
    pub fn set_org_list(&mut self, orgs: Vec<OrgRecord>) -> Result<()> {
        self.state.org_list = Some(orgs);
        self.save()
    }

    /// Put a record first, dropping any earlier record with the same identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the state file cannot be written
    pub fn upsert_front(&mut self, org: OrgRecord) -> Result<()> {
        let id = org.identifier().to_owned();
        let list = self.state.org_list.get_or_insert_with(Vec::new);
        list.retain(|existing| existing.identifier() != id);
        list.insert(0, org);
        self.save()
    }

    /// Drop a record from the cached list; absent ids are a no-op
    ///
    /// # Errors
    ///
    /// Returns an error if the state file cannot be written
    pub fn remove_org(&mut self, id: &str) -> Result<bool> {
        let Some(list) = self.state.org_list.as_mut() else {
            return Ok(false);
        };
        let before = list.len();
        list.retain(|org| org.identifier() != id);
        if list.len() == before {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Record that an org was opened at `when`
    ///
    /// # Errors
    ///
    /// Returns an error if the state file cannot be written
    pub fn stamp_opened(&mut self, id: &str, when: DateTime<Utc>) -> Result<()> {
        self.state.last_opened.insert(
            id.to_owned(),
            when.to_rfc3339_opts(SecondsFormat::Millis, true),
        );
        self.save()
    }

    /// Forget an org's last-opened time; absent ids are a no-op
    ///
    /// # Errors
    ///
    /// Returns an error if the state file cannot be written
    pub fn forget_opened(&mut self, id: &str) -> Result<bool> {
        if self.state.last_opened.remove(id).is_none() {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !self.system.exists(parent)
        {
            self.system
                .create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))
                .map_err(|e| PanelError::state(format!("{e:#}")))?;
        }

        let json = serde_json::to_string_pretty(&self.state)
            .context("Failed to serialize panel state")?;
        self.system
            .write(&self.path, json.as_bytes())
            .map_err(|e| PanelError::state(format!("Failed to write {}: {e}", self.path.display())))?;
        Ok(())
    }
}
