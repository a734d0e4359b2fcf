//! Wrapper around the external org-management CLI
//!
//! Every call the panel makes goes through one of the fixed argument
//! templates below. Captured calls decode the JSON envelope; interactive
//! calls run uncaptured (browser logins), either on the terminal or
//! detached from our stdio when stdout is a protocol channel.

pub mod envelope;

use crate::error::PanelError;
use crate::org::{OrgListResult, OrgRecord};
use crate::system::{Attach, CommandOutput, System};
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Field carrying the credential URL in `org display --verbose`
pub const AUTH_URL_FIELD: &str = "sfdxAuthUrl";

/// Failure text the CLI prints when the target org is not authorized
const ORG_NOT_FOUND_MARKERS: [&str; 3] = [
    "NamedOrgNotFound",
    "NoOrgFound",
    "No authorization information found",
];

/// Handle on the external CLI binary
pub struct OrgCli<'sys> {
    system: &'sys dyn System,
    program: String,
    show_progress: bool,
    login_attach: Attach,
}

impl<'sys> OrgCli<'sys> {
    #[must_use]
    pub fn new<S: Into<String>>(system: &'sys dyn System, program: S) -> Self {
        Self {
            system,
            program: program.into(),
            show_progress: false,
            login_attach: Attach::Terminal,
        }
    }

    /// Show a spinner on stderr while captured calls run
    #[must_use]
    pub const fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// How browser logins are attached to our stdio
    pub fn set_login_attach(&mut self, attach: Attach) {
        self.login_attach = attach;
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// `org list --json`, flattened into one sequence
    ///
    /// # Errors
    ///
    /// Fails on a non-zero exit, an unparsable envelope, or an unrecognized result shape
    pub fn list_orgs(&self) -> Result<Vec<OrgRecord>> {
        let result = self.run_json("Listing orgs", &["org", "list", "--json"])?;
        let orgs: Vec<OrgRecord> = OrgListResult::from_value(result)?
            .into_orgs()
            .into_iter()
            .map(OrgRecord::without_credentials)
            .collect();
        debug!("CLI reported {} orgs", orgs.len());
        Ok(orgs)
    }

    /// `org open --target-org <id>`
    ///
    /// # Errors
    ///
    /// Fails if the CLI cannot be run or exits non-zero
    pub fn open_org(&self, id: &str) -> Result<()> {
        self.run_plain("Opening org", &["org", "open", "--target-org", id])
    }

    /// `org logout --target-org <id> --no-prompt`
    ///
    /// An org the CLI no longer knows counts as logged out.
    ///
    /// # Errors
    ///
    /// Fails if the CLI cannot be run or exits non-zero for any other reason
    pub fn logout(&self, id: &str) -> Result<()> {
        let description = "Logging out";
        let output = self.capture(
            description,
            &["org", "logout", "--target-org", id, "--no-prompt"],
        )?;
        if output.success() {
            return Ok(());
        }

        let text = envelope::failure_text(&output);
        if ORG_NOT_FOUND_MARKERS.iter().any(|marker| text.contains(marker)) {
            debug!("{} is not authorized in the CLI; treating as logged out", id);
            return Ok(());
        }
        Err(PanelError::subprocess(format!("{description}: {text}")).into())
    }

    /// `org display --target-org <id> --verbose --json`, reduced to the auth URL
    ///
    /// # Errors
    ///
    /// - `Subprocess`/`Parse` when the call fails
    /// - `MissingField` when the response carries no auth URL
    pub fn auth_url(&self, id: &str) -> Result<String> {
        let result = self.run_json(
            "Fetching auth URL",
            &["org", "display", "--target-org", id, "--verbose", "--json"],
        )?;

        result
            .get(AUTH_URL_FIELD)
            .and_then(Value::as_str)
            .filter(|url| !url.trim().is_empty())
            .map(str::to_owned)
            .ok_or_else(|| {
                PanelError::missing_field(
                    AUTH_URL_FIELD,
                    format!("org display returned no auth URL for {id}"),
                )
                .into()
            })
    }

    /// `org display --target-org <id> --json`, as a record
    ///
    /// # Errors
    ///
    /// Fails when the call fails or the result is not an org object
    pub fn org_details(&self, id: &str) -> Result<OrgRecord> {
        let mut result = self.run_json(
            "Fetching org details",
            &["org", "display", "--target-org", id, "--json"],
        )?;

        // display names the org id `id` where list uses `orgId`
        if let Some(object) = result.as_object_mut()
            && !object.contains_key("orgId")
            && let Some(org_id) = object.remove("id")
        {
            object.insert("orgId".to_owned(), org_id);
        }

        serde_json::from_value(result)
            .map_err(|e| PanelError::parse(format!("org display result for {id}: {e}")).into())
    }

    /// `config set target-org=<id>`
    ///
    /// # Errors
    ///
    /// Fails if the CLI cannot be run or exits non-zero
    pub fn set_default_org(&self, id: &str) -> Result<()> {
        let assignment = format!("target-org={id}");
        self.run_plain("Setting default org", &["config", "set", &assignment])
    }

    /// `org login web --alias <alias> --instance-url <url> [--set-default-dev-hub]`
    ///
    /// Runs attached to the terminal; the CLI opens a browser and waits.
    ///
    /// # Errors
    ///
    /// Fails if the CLI cannot be run or exits non-zero
    pub fn login_web(&self, alias: &str, instance_url: &str, dev_hub: bool) -> Result<()> {
        let mut args = vec![
            "org".to_owned(),
            "login".to_owned(),
            "web".to_owned(),
            "--alias".to_owned(),
            alias.to_owned(),
            "--instance-url".to_owned(),
            instance_url.to_owned(),
        ];
        if dev_hub {
            args.push("--set-default-dev-hub".to_owned());
        }

        info!("Opening browser login for {} at {}", alias, instance_url);
        let status = self
            .system
            .run_interactive(&self.program, &args, self.login_attach)
            .map_err(|e| PanelError::subprocess(format!("Login: failed to run {}: {e}", self.program)))?;

        match status {
            Some(0) => Ok(()),
            Some(code) => Err(PanelError::subprocess(format!("Login exited with code {code}")).into()),
            None => Err(PanelError::subprocess("Login was terminated by a signal").into()),
        }
    }

    /// `--version`, raw text
    ///
    /// # Errors
    ///
    /// Fails if the CLI cannot be run or exits non-zero
    pub fn version_text(&self) -> Result<String> {
        let output = self.capture("Checking CLI version", &["--version"])?;
        if !output.success() {
            return Err(PanelError::subprocess(format!(
                "Checking CLI version: {}",
                envelope::failure_text(&output)
            ))
            .into());
        }
        Ok(output.stdout)
    }

    fn run_json(&self, description: &str, args: &[&str]) -> Result<Value> {
        let output = self.capture(description, args)?;
        envelope::decode(description, &output)
    }

    fn run_plain(&self, description: &str, args: &[&str]) -> Result<()> {
        let output = self.capture(description, args)?;
        if output.success() {
            return Ok(());
        }
        Err(PanelError::subprocess(format!(
            "{description}: {}",
            envelope::failure_text(&output)
        ))
        .into())
    }

    fn capture(&self, description: &str, args: &[&str]) -> Result<CommandOutput> {
        let args: Vec<String> = args.iter().map(|a| (*a).to_owned()).collect();
        let spinner = self.show_progress.then(|| spinner(description));

        let output = self.system.run_captured(&self.program, &args);

        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        output.map_err(|e| {
            PanelError::subprocess(format!(
                "{description}: failed to run {}: {e}",
                self.program
            ))
            .into()
        })
    }
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("{message}..."));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
