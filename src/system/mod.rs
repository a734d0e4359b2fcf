//! System abstraction for clock, filesystem and process operations
//!
//! This module provides a unified trait for all external system interactions,
//! allowing the panel to be driven entirely by a mock in tests.

use chrono::{DateTime, Utc};
use std::io;
use std::path::Path;

pub mod mock;
pub mod real;

pub use mock::MockSystem;
pub use real::RealSystem;

/// Captured result of a finished subprocess
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// A successful run with the given stdout
    #[must_use]
    pub fn ok<S: Into<String>>(stdout: S) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed run with the given exit code and stderr
    #[must_use]
    pub fn failed<S: Into<String>>(code: i32, stderr: S) -> Self {
        Self {
            status: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Whether the process exited with status zero
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.status, Some(0))
    }
}

/// Where an interactive child's standard streams go
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Attach {
    /// Inherit stdin, stdout and stderr
    #[default]
    Terminal,
    /// No stdin, and stdout is sent to our stderr; keeps our own stdio untouched
    Stderr,
}

/// Unified trait for system operations (clock + filesystem + processes)
///
/// # Implementations
/// - `RealSystem`: Production implementation using `std::fs` and `std::process`
/// - `MockSystem`: Test implementation with in-memory files and scripted commands
pub trait System: Send + Sync {
    // ==================== Clock ====================

    /// Current wall-clock time
    fn now(&self) -> DateTime<Utc>;

    // ==================== Filesystem Operations ====================

    /// Read entire file contents as a string
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Replace a file's contents; readers never observe a partial write
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Recursively create a directory and all parent directories
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    // ==================== Process Operations ====================

    /// Run a program to completion with stdout and stderr captured
    fn run_captured(&self, program: &str, args: &[String]) -> io::Result<CommandOutput>;

    /// Run a program without capturing its output, returning its exit code
    ///
    /// Used for flows that need the user, such as a browser login.
    fn run_interactive(
        &self,
        program: &str,
        args: &[String],
        attach: Attach,
    ) -> io::Result<Option<i32>>;

    /// Place text on the system clipboard
    fn set_clipboard(&self, text: &str) -> io::Result<()>;
}
