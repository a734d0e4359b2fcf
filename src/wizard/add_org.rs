//! Add-org wizard: org kind, then instance, then alias

use super::Prompter;
use crate::error::PanelError;
use anyhow::Result;
use serde::{Deserialize, Serialize};

pub const PRODUCTION_LOGIN_URL: &str = "https://login.salesforce.com";
pub const SANDBOX_LOGIN_URL: &str = "https://test.salesforce.com";

/// What the new org will be used as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum OrgKind {
    /// A regular org
    Standard,
    /// An org that creates scratch orgs; becomes the default dev hub
    DevHub,
}

/// Where to log in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceChoice {
    Production,
    Sandbox,
    Custom(String),
}

impl InstanceChoice {
    /// `production`, `sandbox`, or an `https://` URL
    ///
    /// # Errors
    ///
    /// Returns a configuration error for anything else
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        match text.to_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "sandbox" | "test" => Ok(Self::Sandbox),
            _ => validate_custom_url(text).map(|()| Self::Custom(text.trim_end_matches('/').to_owned())),
        }
    }

    #[must_use]
    pub fn login_url(&self) -> &str {
        match self {
            Self::Production => PRODUCTION_LOGIN_URL,
            Self::Sandbox => SANDBOX_LOGIN_URL,
            Self::Custom(url) => url,
        }
    }
}

/// Answers supplied before the wizard runs; the matching steps are skipped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddOrgDefaults {
    pub kind: Option<OrgKind>,
    pub instance: Option<String>,
    pub alias: Option<String>,
}

/// Completed wizard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOrgRequest {
    pub kind: OrgKind,
    pub instance: InstanceChoice,
    pub alias: String,
}

fn validate_custom_url(url: &str) -> Result<()> {
    let host = url.strip_prefix("https://").unwrap_or_default();
    if host.is_empty() || host.contains(char::is_whitespace) {
        return Err(PanelError::configuration(format!(
            "Invalid instance '{url}'. Use 'production', 'sandbox', or an https:// URL"
        ))
        .into());
    }
    Ok(())
}

fn validate_alias(alias: &str) -> Result<()> {
    if alias.is_empty() {
        return Err(PanelError::configuration("Alias cannot be empty").into());
    }
    if alias.contains(char::is_whitespace) {
        return Err(PanelError::configuration(format!(
            "Alias '{alias}' cannot contain whitespace"
        ))
        .into());
    }
    Ok(())
}

/// Walk the user through the questions not already answered by `defaults`
///
/// # Errors
///
/// Returns an error if a prompt is aborted or an answer is invalid
pub fn run_add_org_wizard(prompter: &dyn Prompter, defaults: AddOrgDefaults) -> Result<AddOrgRequest> {
    let kind = match defaults.kind {
        Some(kind) => kind,
        None => {
            let items = ["Standard org", "Dev Hub"];
            match prompter.select("What kind of org?", &items, 0)? {
                1 => OrgKind::DevHub,
                _ => OrgKind::Standard,
            }
        }
    };

    let instance = match defaults.instance.as_deref() {
        Some(text) => InstanceChoice::parse(text)?,
        None => {
            let items = ["Production / Developer Edition", "Sandbox", "Custom URL"];
            match prompter.select("Where do you log in?", &items, 0)? {
                0 => InstanceChoice::Production,
                1 => InstanceChoice::Sandbox,
                _ => {
                    let url = prompter.input("Instance URL (https://...)", None)?;
                    let url = url.trim();
                    validate_custom_url(url)?;
                    InstanceChoice::Custom(url.trim_end_matches('/').to_owned())
                }
            }
        }
    };

    let alias = match defaults.alias {
        Some(alias) => alias.trim().to_owned(),
        None => prompter.input("Alias for this org", None)?.trim().to_owned(),
    };
    validate_alias(&alias)?;

    Ok(AddOrgRequest {
        kind,
        instance,
        alias,
    })
}
