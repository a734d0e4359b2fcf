//! Startup check that the external CLI is recent enough

use crate::sf::OrgCli;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::{debug, warn};

static VERSION_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\d+)\.(\d+)\.(\d+)").ok());

/// `MAJOR.MINOR.PATCH`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        find_version(text).ok_or_else(|| format!("no MAJOR.MINOR.PATCH version in '{text}'"))
    }
}

/// First three-part version number anywhere in free-form text
#[must_use]
pub fn find_version(text: &str) -> Option<Version> {
    let captures = VERSION_PATTERN.as_ref()?.captures(text)?;
    let part = |index: usize| captures.get(index)?.as_str().parse::<u64>().ok();
    Some(Version {
        major: part(1)?,
        minor: part(2)?,
        patch: part(3)?,
    })
}

/// Outcome of the version check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreflightStatus {
    Supported(Version),
    Outdated { found: Version, minimum: Version },
    /// The CLI could not be run or its version could not be read
    Unknown,
}

/// Run `--version` and compare against `minimum`
///
/// Never fails: an outdated CLI is a warning, an unreadable one is logged
/// at debug level only.
#[must_use]
pub fn check_cli_version(cli: &OrgCli<'_>, minimum: Version) -> PreflightStatus {
    let text = match cli.version_text() {
        Ok(text) => text,
        Err(err) => {
            debug!("Version check skipped: {:#}", err);
            return PreflightStatus::Unknown;
        }
    };

    let Some(found) = find_version(&text) else {
        debug!("Could not find a version number in: {}", text.trim());
        return PreflightStatus::Unknown;
    };

    if found < minimum {
        warn!(
            "{} {} is older than the supported minimum {}; update it with `{} update`",
            cli.program(),
            found,
            minimum,
            cli.program()
        );
        return PreflightStatus::Outdated { found, minimum };
    }

    debug!("{} version {} ok", cli.program(), found);
    PreflightStatus::Supported(found)
}
