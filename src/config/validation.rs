//! Settings validation logic

use crate::config::Settings;
use crate::error::PanelError;
use crate::preflight::Version;
use anyhow::Result;

/// Validate settings beyond what the schema checks
///
/// # Errors
///
/// Returns an error if:
/// - The CLI path is blank
/// - The minimum CLI version is not `MAJOR.MINOR.PATCH`
/// - The time buckets are not positive
pub fn validate_settings(settings: &Settings) -> Result<()> {
    if settings.cli_path.trim().is_empty() {
        return Err(PanelError::configuration("cliPath cannot be empty").into());
    }

    settings
        .min_cli_version
        .parse::<Version>()
        .map_err(|e| PanelError::configuration(format!("minCliVersion: {e}")))?;

    let buckets = &settings.time_buckets;
    for (name, value) in [
        ("justNowSecs", buckets.just_now_secs),
        ("minutesUntil", buckets.minutes_until),
        ("hoursUntil", buckets.hours_until),
        ("daysUntil", buckets.days_until),
    ] {
        if value <= 0 {
            return Err(PanelError::configuration(format!(
                "timeBuckets.{name} must be positive, got {value}"
            ))
            .into());
        }
    }

    if let Some(path) = settings.state_file.as_ref()
        && path.as_os_str().is_empty()
    {
        return Err(PanelError::configuration("stateFile cannot be empty").into());
    }

    Ok(())
}
