//! Real system implementation using `std::fs` and `std::process`

use super::{Attach, CommandOutput, System};
use chrono::{DateTime, Utc};
use std::fs;
use std::io::{self, Write as _};
use std::path::Path;
use std::process::{Command, Stdio};
use tempfile::NamedTempFile;
use tracing::debug;

/// Clipboard helpers tried in order; the first one that runs wins
#[cfg(target_os = "macos")]
const CLIPBOARD_COMMANDS: &[(&str, &[&str])] = &[("pbcopy", &[])];

#[cfg(target_os = "windows")]
const CLIPBOARD_COMMANDS: &[(&str, &[&str])] = &[("clip", &[])];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const CLIPBOARD_COMMANDS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

/// Production implementation of System trait
#[derive(Debug, Clone, Copy)]
pub struct RealSystem;

impl RealSystem {
    /// Create a new `RealSystem` instance
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for RealSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for RealSystem {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let mut file = match dir {
            Some(dir) => NamedTempFile::new_in(dir)?,
            None => NamedTempFile::new_in(".")?,
        };
        file.write_all(contents)?;
        file.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn run_captured(&self, program: &str, args: &[String]) -> io::Result<CommandOutput> {
        debug!("Running: {} {}", program, args.join(" "));
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn run_interactive(
        &self,
        program: &str,
        args: &[String],
        attach: Attach,
    ) -> io::Result<Option<i32>> {
        debug!("Running interactively ({:?}): {} {}", attach, program, args.join(" "));
        let mut command = Command::new(program);
        command.args(args);
        if attach == Attach::Stderr {
            command
                .stdin(Stdio::null())
                .stdout(Stdio::from(io::stderr()));
        }
        let status = command.status()?;
        Ok(status.code())
    }

    fn set_clipboard(&self, text: &str) -> io::Result<()> {
        let mut last_error = io::Error::new(io::ErrorKind::NotFound, "no clipboard helper found");

        for (program, args) in CLIPBOARD_COMMANDS {
            let spawned = Command::new(program)
                .args(*args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();

            let mut child = match spawned {
                Ok(child) => child,
                Err(err) => {
                    debug!("Clipboard helper {} unavailable: {}", program, err);
                    last_error = err;
                    continue;
                }
            };

            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(text.as_bytes())?;
            }

            let status = child.wait()?;
            if status.success() {
                return Ok(());
            }
            last_error = io::Error::other(format!("{program} exited with {status}"));
        }

        Err(last_error)
    }
}
