//! Org record model and classification rules

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Status string the CLI reports for a usable org
pub const CONNECTED: &str = "Connected";

/// Fields the CLI may include that must never reach the state file
const CREDENTIAL_FIELDS: [&str; 5] = [
    "accessToken",
    "refreshToken",
    "sfdxAuthUrl",
    "password",
    "clientSecret",
];

/// One org as reported by the external CLI
///
/// Only the fields the panel reads are typed; everything else the CLI
/// returns is kept in `extra` so a re-persisted list loses nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connected_status: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_scratch: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_dev_hub: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_sandbox: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_expired: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The CLI emits `null` for flags it could not determine
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// Production/sandbox split derived from the instance URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InstanceKind {
    Production,
    Sandbox,
    Unknown,
}

/// Display type of an org, in icon precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OrgType {
    Scratch,
    DevHub,
    Sandbox,
    Production,
}

impl OrgType {
    /// Short badge shown in the type column
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Scratch => "SCR",
            Self::DevHub => "HUB",
            Self::Sandbox => "SBX",
            Self::Production => "PRD",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Scratch => "Scratch",
            Self::DevHub => "Dev Hub",
            Self::Sandbox => "Sandbox",
            Self::Production => "Production",
        }
    }
}

/// Classify an instance URL: `.sandbox.` anywhere means sandbox
#[must_use]
pub fn classify_instance(instance_url: Option<&str>) -> InstanceKind {
    match instance_url.map(str::trim) {
        None | Some("") => InstanceKind::Unknown,
        Some(url) if url.contains(".sandbox.") => InstanceKind::Sandbox,
        Some(_) => InstanceKind::Production,
    }
}

impl OrgRecord {
    /// Alias when set, username otherwise
    #[must_use]
    pub fn identifier(&self) -> &str {
        match self.alias.as_deref() {
            Some(alias) if !alias.trim().is_empty() => alias,
            _ => &self.username,
        }
    }

    /// Drop token and secret fields carried in `extra`
    #[must_use]
    pub fn without_credentials(mut self) -> Self {
        self.extra.retain(|key, _| !CREDENTIAL_FIELDS.contains(&key.as_str()));
        self
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected_status.as_deref() == Some(CONNECTED)
    }

    /// Scratch beats dev hub beats sandbox beats production
    #[must_use]
    pub const fn org_type(&self) -> OrgType {
        if self.is_scratch {
            OrgType::Scratch
        } else if self.is_dev_hub {
            OrgType::DevHub
        } else if self.is_sandbox {
            OrgType::Sandbox
        } else {
            OrgType::Production
        }
    }

    #[must_use]
    pub fn instance_kind(&self) -> InstanceKind {
        classify_instance(self.instance_url.as_deref())
    }

    /// Text for the status badge
    #[must_use]
    pub fn status_label(&self) -> &str {
        if self.is_expired {
            return "Expired";
        }
        match self.connected_status.as_deref() {
            Some(status) if !status.trim().is_empty() => status,
            _ => "Unknown",
        }
    }

    /// Whether the record matches a free-text search, case-insensitively
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        [
            self.alias.as_deref(),
            Some(self.username.as_str()),
            self.org_id.as_deref(),
            self.instance_url.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}
