//! Panel rendering
//!
//! Pure functions from panel state to text. Nothing here touches the CLI
//! or the store.

use super::table::{Row, ViewOptions, visible_rows};
use super::time::{TimeBuckets, format_relative, parse_timestamp};
use crate::org::OrgRecord;
use crate::store::LastOpened;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;

const HEADERS: [&str; 5] = ["TYPE", "ALIAS", "STATUS", "LAST USED", "ACTIONS"];

/// Everything a render needs
#[derive(Debug, Clone, Copy)]
pub struct ViewModel<'a> {
    pub orgs: &'a [OrgRecord],
    pub last_opened: &'a LastOpened,
    pub in_progress: bool,
    pub error: Option<&'a str>,
    pub options: &'a ViewOptions,
    pub now: DateTime<Utc>,
    pub buckets: &'a TimeBuckets,
}

/// JSON projection of the panel for hosts that draw their own UI
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot {
    pub in_progress: bool,
    pub error: Option<String>,
    pub total: usize,
    pub rows: Vec<Row>,
}

impl ViewModel<'_> {
    #[must_use]
    pub fn rows(&self) -> Vec<Row> {
        visible_rows(
            self.orgs,
            self.last_opened,
            self.options,
            self.now,
            self.buckets,
        )
    }

    #[must_use]
    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            in_progress: self.in_progress,
            error: self.error.map(str::to_owned),
            total: self.orgs.len(),
            rows: self.rows(),
        }
    }
}

/// Render the org table as aligned plain text
#[must_use]
pub fn render(model: &ViewModel<'_>) -> String {
    let mut out = String::new();

    if let Some(error) = model.error {
        let _ = writeln!(out, "Error: {error}");
        out.push('\n');
    }

    if model.in_progress {
        out.push_str("Loading orgs...\n");
        if model.orgs.is_empty() {
            return out;
        }
    }

    if model.orgs.is_empty() {
        out.push_str("No orgs found. Run `orgdeck add` to authorize one.\n");
        return out;
    }

    let rows = model.rows();
    if rows.is_empty() {
        let _ = writeln!(
            out,
            "No orgs match the current filters ({} hidden).",
            model.orgs.len()
        );
        return out;
    }

    let cells: Vec<[String; 5]> = rows
        .iter()
        .map(|row| {
            [
                row.icon.to_owned(),
                row.id.clone(),
                row.status.clone(),
                row.last_used.clone(),
                row.actions.join(" "),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write_line(&mut out, &HEADERS.map(str::to_owned), &widths);
    write_line(&mut out, &widths.map(|w| "-".repeat(w)), &widths);
    for row in &cells {
        write_line(&mut out, row, &widths);
    }

    let hidden = model.orgs.len() - rows.len();
    if hidden > 0 {
        let _ = writeln!(out, "\n{} of {} orgs shown", rows.len(), model.orgs.len());
    }

    out
}

fn write_line(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:width$}"))
        .collect();
    let _ = writeln!(out, "{}", line.join("  ").trim_end());
}

/// Render the detail popover for one org
#[must_use]
pub fn render_detail(
    org: &OrgRecord,
    last_opened: &LastOpened,
    now: DateTime<Utc>,
    buckets: &TimeBuckets,
) -> String {
    let last_used = last_opened
        .get(org.identifier())
        .and_then(|t| parse_timestamp(t))
        .map_or_else(|| "Never".to_owned(), |t| format_relative(t, now, buckets));

    let fields = [
        ("Alias", org.alias.clone().unwrap_or_else(|| "-".to_owned())),
        ("Username", org.username.clone()),
        ("Org ID", org.org_id.clone().unwrap_or_else(|| "-".to_owned())),
        (
            "Instance URL",
            org.instance_url.clone().unwrap_or_else(|| "-".to_owned()),
        ),
        ("Type", org.org_type().label().to_owned()),
        ("Instance", format!("{:?}", org.instance_kind())),
        ("Status", org.status_label().to_owned()),
        ("Last used", last_used),
    ];

    let width = fields.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (label, value) in fields {
        let _ = writeln!(out, "{label:>width$}  {value}");
    }
    out
}
