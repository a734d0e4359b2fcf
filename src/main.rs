//! # `orgdeck`
//!
//! `orgdeck` is a terminal panel over the `sf` CLI. It lists the orgs the CLI
//! has authorized, remembers which ones you opened last, and lets you open,
//! log out of, re-authenticate, or add orgs without remembering the flags.
//!
//! ## Usage
//!
//! ```sh
//! orgdeck                          # cached org table
//! orgdeck list --refresh --sort last-used
//! orgdeck open my-sandbox
//! orgdeck add --kind dev-hub --instance production --alias hub
//! orgdeck serve                    # JSON lines on stdin/stdout for editor hosts
//! ```
//!
//! See `orgdeck --help` for every option.

use anyhow::Result;
use clap::Parser as _;
use orgdeck::cli::Args;
use orgdeck::error::PanelError;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    let args = Args::parse();

    // Keep stdout clean for machine-readable modes
    let log_level = if args.machine_output() {
        "error"
    } else if args.verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    match orgdeck::run(&args) {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            error!("{:#}", err);
            std::process::exit(
                err.downcast_ref::<PanelError>()
                    .map_or(1, PanelError::exit_code),
            );
        }
    }
}
