//! Row derivation, filtering and sorting

use super::time::{TimeBuckets, format_relative, parse_timestamp};
use crate::org::{OrgRecord, OrgType};
use crate::store::LastOpened;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Column a table can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Alias,
    Status,
    LastUsed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Which rows to show and in what order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewOptions {
    pub search: Option<String>,
    pub hide_disconnected: bool,
    pub sort: Option<SortKey>,
    pub direction: SortDirection,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            search: None,
            hide_disconnected: true,
            sort: None,
            direction: SortDirection::Ascending,
        }
    }
}

/// One rendered row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub id: String,
    pub org_type: OrgType,
    pub icon: &'static str,
    pub alias: String,
    pub username: String,
    pub status: String,
    pub connected: bool,
    pub last_used: String,
    pub last_used_at: Option<DateTime<Utc>>,
    pub actions: Vec<&'static str>,
}

impl Row {
    #[must_use]
    pub fn from_record(
        org: &OrgRecord,
        last_opened: &LastOpened,
        now: DateTime<Utc>,
        buckets: &TimeBuckets,
    ) -> Self {
        let id = org.identifier().to_owned();
        let last_used_at = last_opened.get(&id).and_then(|t| parse_timestamp(t));
        let last_used = last_used_at
            .map_or_else(|| "Never".to_owned(), |t| format_relative(t, now, buckets));
        let connected = org.is_connected();
        let org_type = org.org_type();

        let actions = if connected {
            vec!["open", "auth-url", "set-default", "logout"]
        } else {
            vec!["reauth", "logout"]
        };

        Self {
            org_type,
            icon: org_type.icon(),
            alias: org.alias.clone().unwrap_or_default(),
            username: org.username.clone(),
            status: org.status_label().to_owned(),
            connected,
            last_used,
            last_used_at,
            actions,
            id,
        }
    }
}

/// Apply search, the disconnected filter and sorting
#[must_use]
pub fn visible_rows(
    orgs: &[OrgRecord],
    last_opened: &LastOpened,
    options: &ViewOptions,
    now: DateTime<Utc>,
    buckets: &TimeBuckets,
) -> Vec<Row> {
    let search = options.search.as_deref().unwrap_or_default();
    let mut rows: Vec<Row> = orgs
        .iter()
        .filter(|org| !options.hide_disconnected || org.is_connected())
        .filter(|org| org.matches(search))
        .map(|org| Row::from_record(org, last_opened, now, buckets))
        .collect();

    if let Some(key) = options.sort {
        sort_rows(&mut rows, key, options.direction);
    }
    rows
}

/// Stable sort; rows never opened stay last whichever the direction
pub fn sort_rows(rows: &mut [Row], key: SortKey, direction: SortDirection) {
    let directed = |ordering: Ordering| match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    };

    rows.sort_by(|a, b| match key {
        SortKey::Alias => directed(a.id.cmp(&b.id)),
        SortKey::Status => directed(a.status.cmp(&b.status)),
        SortKey::LastUsed => match (a.last_used_at, b.last_used_at) {
            (Some(x), Some(y)) => directed(x.cmp(&y)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    });
}
