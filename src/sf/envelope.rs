//! The JSON envelope wrapped around every `--json` response

use crate::error::PanelError;
use crate::system::CommandOutput;
use anyhow::Result;
use serde::Deserialize;
use serde_json::Value;

/// `{ "status": 0, "result": ..., "message": ... }`
#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub status: i64,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Turn a finished `--json` invocation into its `result` payload
///
/// The CLI prints an envelope on failure too, so its `message` is
/// preferred over raw stderr when reporting.
///
/// # Errors
///
/// - `Subprocess` when the exit code or the envelope status is non-zero
/// - `Parse` when stdout is not an envelope, or a successful envelope has no result
pub fn decode(description: &str, output: &CommandOutput) -> Result<Value> {
    let envelope = serde_json::from_str::<Envelope>(output.stdout.trim());

    if !output.success() || envelope.as_ref().is_ok_and(|e| e.status != 0) {
        let message = envelope
            .ok()
            .and_then(|e| match (e.name, e.message) {
                (Some(name), Some(message)) => Some(format!("{name}: {message}")),
                (None, Some(message)) => Some(message),
                _ => None,
            })
            .unwrap_or_else(|| failure_text(output));
        return Err(PanelError::subprocess(format!("{description}: {message}")).into());
    }

    let envelope = envelope.map_err(|e| {
        PanelError::parse(format!("{description}: output is not valid JSON: {e}"))
    })?;

    envelope
        .result
        .ok_or_else(|| PanelError::parse(format!("{description}: response has no result")).into())
}

/// Best human-readable text for a failed run
#[must_use]
pub fn failure_text(output: &CommandOutput) -> String {
    let stderr = output.stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_owned();
    }
    let stdout = output.stdout.trim();
    if !stdout.is_empty() {
        return stdout.to_owned();
    }
    match output.status {
        Some(code) => format!("exited with code {code}"),
        None => "terminated by signal".to_owned(),
    }
}
