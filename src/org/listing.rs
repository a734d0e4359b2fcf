//! Decoding of the org list command's result payload
//!
//! The CLI has returned two shapes over time: a flat array of orgs, or an
//! object splitting orgs into named groups. Both are decoded explicitly and
//! anything else is rejected.

use super::OrgRecord;
use crate::error::PanelError;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

/// Either shape of the list result
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OrgListResult {
    Flat(Vec<OrgRecord>),
    Grouped(GroupedOrgs),
}

/// Grouped list result; every group is optional but at least one must be present
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedOrgs {
    #[serde(default)]
    pub non_scratch_orgs: Option<Vec<OrgRecord>>,
    #[serde(default)]
    pub dev_hubs: Option<Vec<OrgRecord>>,
    #[serde(default)]
    pub sandboxes: Option<Vec<OrgRecord>>,
    #[serde(default)]
    pub other: Option<Vec<OrgRecord>>,
    #[serde(default)]
    pub scratch_orgs: Option<Vec<OrgRecord>>,
}

impl GroupedOrgs {
    fn has_any_group(&self) -> bool {
        self.non_scratch_orgs.is_some()
            || self.dev_hubs.is_some()
            || self.sandboxes.is_some()
            || self.other.is_some()
            || self.scratch_orgs.is_some()
    }

    /// Concatenate groups, non-scratch first, dropping repeated identifiers
    fn flatten(self) -> Vec<OrgRecord> {
        let groups = [
            self.non_scratch_orgs,
            self.dev_hubs,
            self.sandboxes,
            self.other,
            self.scratch_orgs,
        ];

        let mut seen = HashSet::new();
        groups
            .into_iter()
            .flatten()
            .flatten()
            .filter(|org| seen.insert(org.identifier().to_owned()))
            .collect()
    }
}

impl OrgListResult {
    /// Decode a raw `result` value
    ///
    /// # Errors
    ///
    /// Returns an error if the value is neither an array of orgs nor an
    /// object carrying at least one known org group
    pub fn from_value(value: Value) -> anyhow::Result<Self> {
        let decoded: Self = serde_json::from_value(value).map_err(|e| {
            PanelError::parse(format!(
                "org list result is neither an array nor a grouped object: {e}"
            ))
        })?;

        if let Self::Grouped(groups) = &decoded
            && !groups.has_any_group()
        {
            return Err(PanelError::parse(
                "org list result object has no known org groups",
            )
            .into());
        }

        Ok(decoded)
    }

    /// One sequence of orgs regardless of shape
    #[must_use]
    pub fn into_orgs(self) -> Vec<OrgRecord> {
        match self {
            Self::Flat(orgs) => orgs,
            Self::Grouped(groups) => groups.flatten(),
        }
    }
}
