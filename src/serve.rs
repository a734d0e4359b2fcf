//! Line-delimited JSON event loop for an embedding host
//!
//! Each input line is one `Action`. Each action produces a `progress` frame
//! followed by exactly one outcome or `error` frame. Frames that change the
//! table carry a fresh `view` snapshot. Browser logins run detached so
//! nothing but frames reaches the output.

use crate::dispatch::{Action, Outcome, dispatch};
use crate::session::Session;
use anyhow::{Context as _, Result};
use serde_json::{Value, json};
use std::io::{BufRead, Write};
use tracing::{debug, error};

/// Run until `input` is exhausted
///
/// Action failures are reported as frames and never end the loop; only
/// I/O errors on the streams do.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails
pub fn serve(session: &mut Session<'_>, input: &mut dyn BufRead, output: &mut dyn Write) -> Result<()> {
    // stdin and stdout carry the protocol
    session.detach_logins();

    session.set_in_progress(true);
    write_frame(output, &view_frame("progress", session)?)?;
    let initial = session.orgs(false);
    session.set_in_progress(false);
    match initial {
        Ok(_) => write_frame(output, &view_frame("render", session)?)?,
        Err(err) => report(session, output, &err)?,
    }

    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line).context("Failed to read action")? == 0 {
            debug!("Input closed; leaving serve loop");
            return Ok(());
        }
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        let action: Action = match serde_json::from_str(text) {
            Ok(action) => action,
            Err(err) => {
                let err = anyhow::anyhow!("Invalid action: {err}");
                report(session, output, &err)?;
                continue;
            }
        };

        session.set_in_progress(true);
        write_frame(output, &view_frame("progress", session)?)?;
        let result = dispatch(session, action);
        session.set_in_progress(false);

        match result {
            Ok(outcome) => {
                session.set_error(None);
                write_frame(output, &outcome_frame(&outcome, session)?)?;
            }
            Err(err) => report(session, output, &err)?,
        }
    }
}

fn report(session: &mut Session<'_>, output: &mut dyn Write, err: &anyhow::Error) -> Result<()> {
    let message = format!("{err:#}");
    error!("{}", message);
    session.set_error(Some(message.clone()));
    let mut frame = view_frame("error", session)?;
    frame["message"] = Value::String(message);
    write_frame(output, &frame)
}

fn view_frame(kind: &str, session: &Session<'_>) -> Result<Value> {
    Ok(json!({
        "kind": kind,
        "view": serde_json::to_value(session.view().snapshot())?,
    }))
}

fn outcome_frame(outcome: &Outcome, session: &Session<'_>) -> Result<Value> {
    let mut frame = serde_json::to_value(outcome)?;
    if matches!(outcome, Outcome::Render | Outcome::RemoveRow { .. }) {
        frame["view"] = serde_json::to_value(session.view().snapshot())?;
    }
    Ok(frame)
}

fn write_frame(output: &mut dyn Write, frame: &Value) -> Result<()> {
    serde_json::to_writer(&mut *output, frame).context("Failed to write frame")?;
    output.write_all(b"\n").context("Failed to write frame")?;
    output.flush().context("Failed to flush output")?;
    Ok(())
}
