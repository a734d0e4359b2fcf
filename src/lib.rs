//! `orgdeck` - A terminal panel for authenticated orgs
//!
//! This library wraps an external org-management CLI: it caches the org
//! list it reports, remembers when each org was last opened, renders both
//! as a filterable table, and turns user actions into further CLI calls.

pub mod cache;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod org;
pub mod preflight;
pub mod serve;
pub mod session;
pub mod sf;
pub mod store;
pub mod system;
pub mod view;
pub mod wizard;

use anyhow::{Context as _, Result};
use cli::{Args, ListArgs, OutputFormat, PanelCommand};
use config::Settings;
use dispatch::{Outcome, dispatch};
use session::Session;
use std::io::{self, IsTerminal as _, Write};
use system::{RealSystem, System};
use tracing::info;
use wizard::{NoPrompter, Prompter, TerminalPrompter};

/// Main entry point for the orgdeck library
pub fn run(args: &Args) -> Result<()> {
    let system = RealSystem::new();
    let serving = matches!(args.command, Some(PanelCommand::Serve));

    let prompter: Box<dyn Prompter> = if serving {
        Box::new(NoPrompter)
    } else {
        Box::new(TerminalPrompter::new())
    };
    let show_progress = !args.machine_output() && io::stderr().is_terminal();

    let mut session = open_session(&system, args, prompter)?.with_progress(show_progress);

    if serving {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout().lock();
        return serve::serve(&mut session, &mut input, &mut output);
    }

    let mut output = io::stdout().lock();
    run_command(&mut session, &args.subcommand(), &mut output)
}

/// Resolve settings from the file and command-line overrides, then open a session
///
/// # Errors
///
/// Returns an error if the settings are invalid or the state file cannot be read
pub fn open_session<'sys>(
    system: &'sys dyn System,
    args: &Args,
    prompter: Box<dyn Prompter + 'sys>,
) -> Result<Session<'sys>> {
    let settings = resolve_settings(system, args)?;
    let session = Session::new(system, settings, prompter)?;
    let _ = session.preflight();
    Ok(session)
}

/// Settings file merged with command-line overrides
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or the merged settings are invalid
pub fn resolve_settings(system: &dyn System, args: &Args) -> Result<Settings> {
    let mut settings = Settings::load(system, args.config.as_deref())?;

    if let Some(cli_path) = args.cli_path.as_ref() {
        settings.cli_path.clone_from(cli_path);
    }
    if let Some(state_file) = args.state_file.as_ref() {
        settings.state_file = Some(state_file.clone());
    }
    if args.skip_preflight {
        settings.skip_preflight = true;
    }

    settings.validate()?;
    Ok(settings)
}

/// Run one non-serve subcommand, writing its result to `output`
///
/// # Errors
///
/// Returns the action's error after anything worth showing has been written
pub fn run_command(session: &mut Session<'_>, command: &PanelCommand, output: &mut dyn Write) -> Result<()> {
    if let PanelCommand::List(list) = command {
        return run_list(session, list, output);
    }

    let Some(action) = command.to_action() else {
        return Ok(());
    };

    let outcome = dispatch(session, action)?;
    present(session, &outcome, output)
}

fn run_list(session: &mut Session<'_>, list: &ListArgs, output: &mut dyn Write) -> Result<()> {
    session.set_options(list.view_options(session.settings().hide_disconnected));

    let loaded = session.orgs(list.refresh);
    if let Err(err) = loaded.as_ref() {
        session.set_error(Some(format!("{err:#}")));
    }

    match list.format {
        OutputFormat::Table => write!(output, "{}", view::render(&session.view()))?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *output, &session.view().snapshot())?;
            writeln!(output)?;
        }
    }

    loaded.map(|_| ())
}

fn present(session: &Session<'_>, outcome: &Outcome, output: &mut dyn Write) -> Result<()> {
    match outcome {
        Outcome::Render => write!(output, "{}", view::render(&session.view()))?,
        Outcome::RemoveRow { id } => {
            writeln!(output, "Logged out of {id}")?;
        }
        Outcome::Notice { message } => writeln!(output, "{message}")?,
        Outcome::Detail { org } => {
            let model = session.view();
            write!(
                output,
                "{}",
                view::render_detail(org, model.last_opened, model.now, model.buckets)
            )?;
        }
        Outcome::Nothing => info!("Nothing changed"),
    }
    output.flush().context("Failed to flush output")
}
