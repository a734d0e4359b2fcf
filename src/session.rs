//! Per-view session
//!
//! A `Session` owns everything one open panel needs: the system handle, the
//! CLI wrapper, the state store, the prompter and the current view options.
//! Handlers take `&mut Session`, so state updates are serialized by the
//! borrow rather than by a lock.

use crate::cache::OrgCache;
use crate::config::Settings;
use crate::org::OrgRecord;
use crate::preflight::{PreflightStatus, Version, check_cli_version};
use crate::sf::OrgCli;
use crate::store::StateStore;
use crate::system::{Attach, System};
use crate::view::{ViewModel, ViewOptions};
use crate::wizard::Prompter;
use anyhow::{Context as _, Result};
use tracing::debug;

pub struct Session<'sys> {
    system: &'sys dyn System,
    cli: OrgCli<'sys>,
    store: StateStore<'sys>,
    prompter: Box<dyn Prompter + 'sys>,
    settings: Settings,
    options: ViewOptions,
    in_progress: bool,
    last_error: Option<String>,
}

impl<'sys> Session<'sys> {
    /// Open the state store and wire up collaborators
    ///
    /// # Errors
    ///
    /// Returns an error if the state file location cannot be resolved or
    /// the existing state file cannot be read
    pub fn new(
        system: &'sys dyn System,
        settings: Settings,
        prompter: Box<dyn Prompter + 'sys>,
    ) -> Result<Self> {
        let state_path = settings.state_path()?;
        debug!("Using state file {}", state_path.display());
        let store = StateStore::open(system, &state_path)?;
        let cli = OrgCli::new(system, settings.cli_path.clone());
        let options = ViewOptions {
            hide_disconnected: settings.hide_disconnected,
            ..ViewOptions::default()
        };

        Ok(Self {
            system,
            cli,
            store,
            prompter,
            settings,
            options,
            in_progress: false,
            last_error: None,
        })
    }

    /// Show a spinner while captured CLI calls run
    #[must_use]
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.cli = self.cli.with_progress(show_progress);
        self
    }

    /// Keep browser logins off our stdin and stdout
    pub fn detach_logins(&mut self) {
        self.cli.set_login_attach(Attach::Stderr);
    }

    /// Run the startup version check unless disabled
    #[must_use]
    pub fn preflight(&self) -> PreflightStatus {
        if self.settings.skip_preflight {
            return PreflightStatus::Unknown;
        }
        match self.settings.min_cli_version.parse::<Version>() {
            Ok(minimum) => check_cli_version(&self.cli, minimum),
            Err(err) => {
                debug!("Skipping version check: {}", err);
                PreflightStatus::Unknown
            }
        }
    }

    /// Org list through the cache
    ///
    /// # Errors
    ///
    /// Returns an error if a fetch was needed and failed
    pub fn orgs(&mut self, force_refresh: bool) -> Result<Vec<OrgRecord>> {
        OrgCache::new(&self.cli, &mut self.store)
            .get(force_refresh)
            .context("Could not load orgs")
    }

    #[must_use]
    pub fn system(&self) -> &'sys dyn System {
        self.system
    }

    #[must_use]
    pub const fn cli(&self) -> &OrgCli<'sys> {
        &self.cli
    }

    #[must_use]
    pub const fn store(&self) -> &StateStore<'sys> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut StateStore<'sys> {
        &mut self.store
    }

    #[must_use]
    pub fn prompter(&self) -> &dyn Prompter {
        self.prompter.as_ref()
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_options(&mut self, options: ViewOptions) {
        self.options = options;
    }

    pub fn set_in_progress(&mut self, in_progress: bool) {
        self.in_progress = in_progress;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.last_error = error;
    }

    /// Current state, ready to render
    #[must_use]
    pub fn view(&self) -> ViewModel<'_> {
        ViewModel {
            orgs: self.store.org_list().unwrap_or_default(),
            last_opened: self.store.last_opened(),
            in_progress: self.in_progress,
            error: self.last_error.as_deref(),
            options: &self.options,
            now: self.system.now(),
            buckets: &self.settings.time_buckets,
        }
    }
}
