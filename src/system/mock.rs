//! Mock system implementation for testing

#![expect(clippy::module_name_repetitions)]

use super::{Attach, CommandOutput, System};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// In-memory implementation of System trait for testing
///
/// `MockSystem` keeps files in memory, answers subprocess calls from a
/// script keyed by the full command line, and records every invocation so
/// tests can assert what was (or was not) run.
///
/// # Example
/// ```
/// use orgdeck::system::{CommandOutput, MockSystem, System};
///
/// let system = MockSystem::new()
///     .with_response("sf --version", CommandOutput::ok("@salesforce/cli/2.61.8")).unwrap();
///
/// let output = system.run_captured("sf", &["--version".to_owned()]).unwrap();
/// assert!(output.success());
/// assert_eq!(system.invocations().len(), 1);
/// ```
#[derive(Clone)]
pub struct MockSystem {
    state: Arc<RwLock<MockSystemState>>,
}

struct MockSystemState {
    now: DateTime<Utc>,
    files: HashMap<PathBuf, Vec<u8>>,
    dirs: HashSet<PathBuf>,
    responses: HashMap<String, VecDeque<CommandOutput>>,
    invocations: Vec<String>,
    interactive: Vec<(String, Attach)>,
    clipboard: Option<String>,
    clipboard_available: bool,
}

fn poisoned<E: ToString>(e: E) -> io::Error {
    io::Error::other(e.to_string())
}

fn command_line(program: &str, args: &[String]) -> String {
    if args.is_empty() {
        program.to_owned()
    } else {
        format!("{program} {}", args.join(" "))
    }
}

impl MockSystem {
    /// Create a new `MockSystem` with default state
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MockSystemState {
                now: DateTime::<Utc>::UNIX_EPOCH,
                files: HashMap::new(),
                dirs: HashSet::from([PathBuf::from("/")]),
                responses: HashMap::new(),
                invocations: Vec::new(),
                interactive: Vec::new(),
                clipboard: None,
                clipboard_available: true,
            })),
        }
    }

    /// Fix the clock (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the internal lock is poisoned
    #[inline]
    pub fn with_now(self, now: DateTime<Utc>) -> io::Result<Self> {
        self.set_now(now)?;
        Ok(self)
    }

    /// Add a file with contents (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the internal lock is poisoned
    #[inline]
    pub fn with_file<P: AsRef<Path>>(self, path: P, contents: &[u8]) -> io::Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let mut state = self.state.write().map_err(poisoned)?;
        if let Some(parent) = path_buf.parent() {
            Self::ensure_parent_dirs(&mut state.dirs, parent);
        }
        state.files.insert(path_buf, contents.to_vec());
        drop(state);
        Ok(self)
    }

    /// Script the output of a command line such as `"sf org list --json"`
    ///
    /// Repeated calls queue further outputs for the same command line. The
    /// last queued output keeps answering once the queue is drained.
    ///
    /// # Errors
    ///
    /// Returns an error if the internal lock is poisoned
    #[inline]
    pub fn with_response(self, command: &str, output: CommandOutput) -> io::Result<Self> {
        let mut state = self.state.write().map_err(poisoned)?;
        state
            .responses
            .entry(command.to_owned())
            .or_default()
            .push_back(output);
        drop(state);
        Ok(self)
    }

    /// Make every clipboard write fail (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the internal lock is poisoned
    #[inline]
    pub fn without_clipboard(self) -> io::Result<Self> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.clipboard_available = false;
        drop(state);
        Ok(self)
    }

    /// Move the clock
    ///
    /// # Errors
    ///
    /// Returns an error if the internal lock is poisoned
    #[inline]
    pub fn set_now(&self, now: DateTime<Utc>) -> io::Result<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.now = now;
        Ok(())
    }

    /// Every command line run so far, in order
    #[must_use]
    #[inline]
    pub fn invocations(&self) -> Vec<String> {
        self.state
            .read()
            .map(|state| state.invocations.clone())
            .unwrap_or_default()
    }

    /// Number of times a given command line was run
    #[must_use]
    #[inline]
    pub fn invocation_count(&self, command: &str) -> usize {
        self.invocations().iter().filter(|c| *c == command).count()
    }

    /// Interactive runs so far, with how each was attached
    #[must_use]
    #[inline]
    pub fn interactive_runs(&self) -> Vec<(String, Attach)> {
        self.state
            .read()
            .map(|state| state.interactive.clone())
            .unwrap_or_default()
    }

    /// Last text placed on the clipboard
    #[must_use]
    #[inline]
    pub fn clipboard(&self) -> Option<String> {
        self.state
            .read()
            .ok()
            .and_then(|state| state.clipboard.clone())
    }

    #[inline]
    fn ensure_parent_dirs(dirs: &mut HashSet<PathBuf>, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            dirs.insert(ancestor.to_path_buf());
        }
    }

    fn answer(&self, program: &str, args: &[String]) -> io::Result<CommandOutput> {
        let line = command_line(program, args);
        let mut state = self.state.write().map_err(poisoned)?;
        state.invocations.push(line.clone());

        let queue = state.responses.get_mut(&line).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("No scripted response for: {line}"),
            )
        })?;

        let output = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        drop(state);

        output.ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("No scripted response for: {line}"),
            )
        })
    }
}

impl Default for MockSystem {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl System for MockSystem {
    #[inline]
    fn now(&self) -> DateTime<Utc> {
        self.state
            .read()
            .map(|state| state.now)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    #[inline]
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let state = self.state.read().map_err(poisoned)?;
        let bytes = state.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            )
        })?;
        drop(state);
        String::from_utf8(bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {e}")))
    }

    #[inline]
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut state = self.state.write().map_err(poisoned)?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !state.dirs.contains(parent)
        {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Parent directory does not exist: {}", parent.display()),
            ));
        }

        state.files.insert(path.to_path_buf(), contents.to_vec());
        drop(state);
        Ok(())
    }

    #[inline]
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        Self::ensure_parent_dirs(&mut state.dirs, path);
        drop(state);
        Ok(())
    }

    #[inline]
    fn exists(&self, path: &Path) -> bool {
        self.state
            .read()
            .map(|state| state.files.contains_key(path) || state.dirs.contains(path))
            .unwrap_or(false)
    }

    #[inline]
    fn run_captured(&self, program: &str, args: &[String]) -> io::Result<CommandOutput> {
        self.answer(program, args)
    }

    #[inline]
    fn run_interactive(
        &self,
        program: &str,
        args: &[String],
        attach: Attach,
    ) -> io::Result<Option<i32>> {
        self.state
            .write()
            .map_err(poisoned)?
            .interactive
            .push((command_line(program, args), attach));
        self.answer(program, args).map(|output| output.status)
    }

    #[inline]
    fn set_clipboard(&self, text: &str) -> io::Result<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if !state.clipboard_available {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                "no clipboard helper found",
            ));
        }
        state.clipboard = Some(text.to_owned());
        Ok(())
    }
}
