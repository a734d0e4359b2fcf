use crate::dispatch::Action;
use crate::view::{SortDirection, SortKey, ViewOptions};
use crate::wizard::OrgKind;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for orgdeck
#[derive(Parser, Debug, Clone)]
#[command(name = "orgdeck")]
#[command(about = "A terminal panel for browsing and managing authenticated orgs through the sf CLI")]
#[command(long_about = None)]
#[command(version)]
pub struct Args {
    /// Settings file path
    #[arg(long, value_name = "PATH", env = "ORGDECK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Org-management CLI to run instead of `sf`
    #[arg(long = "cli", value_name = "PROGRAM", env = "ORGDECK_CLI", global = true)]
    pub cli_path: Option<String>,

    /// Where to keep the cached org list and last-opened times
    #[arg(long, value_name = "PATH", env = "ORGDECK_STATE", global = true)]
    pub state_file: Option<PathBuf>,

    /// Skip the startup CLI version check
    #[arg(long, global = true)]
    pub skip_preflight: bool,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<PanelCommand>,
}

impl Args {
    /// The subcommand to run; a bare invocation lists orgs
    #[must_use]
    pub fn subcommand(&self) -> PanelCommand {
        self.command
            .clone()
            .unwrap_or_else(|| PanelCommand::List(ListArgs::default()))
    }

    /// Whether stdout carries machine-readable output
    #[must_use]
    pub fn machine_output(&self) -> bool {
        match self.command.as_ref() {
            Some(PanelCommand::Serve) => true,
            Some(PanelCommand::List(list)) => list.format == OutputFormat::Json,
            _ => false,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum PanelCommand {
    /// Show the org table
    List(ListArgs),
    /// Open an org in the browser
    Open {
        /// Alias or username
        id: String,
    },
    /// Log out of an org and forget it locally
    Logout {
        /// Alias or username
        id: String,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Copy an org's auth URL to the clipboard and print it
    AuthUrl {
        /// Alias or username
        id: String,
    },
    /// Make an org the CLI's default target org
    SetDefault {
        /// Alias or username
        id: String,
    },
    /// Log in again at an org's stored instance URL
    Reauth {
        /// Alias or username
        id: String,
    },
    /// Authorize a new org through a browser login
    Add {
        /// Kind of org
        #[arg(long, value_enum)]
        kind: Option<OrgKind>,
        /// `production`, `sandbox`, or an https:// instance URL
        #[arg(long, value_name = "INSTANCE")]
        instance: Option<String>,
        /// Alias for the new org
        #[arg(long)]
        alias: Option<String>,
    },
    /// Show everything known about one org
    Show {
        /// Alias or username
        id: String,
    },
    /// Read JSON actions from stdin, one per line, and answer with JSON lines
    Serve,
}

impl PanelCommand {
    /// The dispatcher action for commands other than `list` and `serve`
    #[must_use]
    pub fn to_action(&self) -> Option<Action> {
        let action = match self {
            Self::List(_) | Self::Serve => return None,
            Self::Open { id } => Action::Open { id: id.clone() },
            Self::Logout { id, yes } => Action::Logout {
                id: id.clone(),
                confirmed: *yes,
            },
            Self::AuthUrl { id } => Action::GetAuthUrl { id: id.clone() },
            Self::SetDefault { id } => Action::SetDefaultOrg { id: id.clone() },
            Self::Reauth { id } => Action::Reauthenticate { id: id.clone() },
            Self::Add {
                kind,
                instance,
                alias,
            } => Action::AddOrg {
                kind: *kind,
                instance: instance.clone(),
                alias: alias.clone(),
            },
            Self::Show { id } => Action::Show { id: id.clone() },
        };
        Some(action)
    }
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Ask the CLI again instead of using the cached list
    #[arg(long)]
    pub refresh: bool,

    /// Only show orgs whose alias, username, org id or URL contains this text
    #[arg(long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Include orgs that are not connected
    #[arg(long)]
    pub show_disconnected: bool,

    /// Sort column
    #[arg(long, value_enum)]
    pub sort: Option<SortKey>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

impl ListArgs {
    /// View options with the settings' default for hiding disconnected orgs
    #[must_use]
    pub fn view_options(&self, hide_disconnected_default: bool) -> ViewOptions {
        ViewOptions {
            search: self.search.clone().filter(|s| !s.trim().is_empty()),
            hide_disconnected: hide_disconnected_default && !self.show_disconnected,
            sort: self.sort,
            direction: if self.desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}
