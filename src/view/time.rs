//! Relative "last used" formatting

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Upper bounds of each relative-time bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeBuckets {
    /// Below this many seconds: "Just now"
    pub just_now_secs: i64,
    /// Below this many minutes: "<n> min ago"
    pub minutes_until: i64,
    /// Below this many hours: "<n> hr ago"
    pub hours_until: i64,
    /// Below this many days: "<n> day(s) ago"; older shows the date
    pub days_until: i64,
}

impl Default for TimeBuckets {
    fn default() -> Self {
        Self {
            just_now_secs: 60,
            minutes_until: 60,
            hours_until: 24,
            days_until: 7,
        }
    }
}

/// Parse a stored timestamp, ignoring ones that do not parse
#[must_use]
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Local calendar date used once a timestamp falls out of every bucket
#[must_use]
pub fn format_date(then: DateTime<Utc>) -> String {
    then.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

/// Human description of how long ago `then` was
#[must_use]
pub fn format_relative(then: DateTime<Utc>, now: DateTime<Utc>, buckets: &TimeBuckets) -> String {
    let elapsed = now.signed_duration_since(then);

    if elapsed.num_seconds() < buckets.just_now_secs {
        return "Just now".to_owned();
    }

    let minutes = elapsed.num_minutes();
    if minutes < buckets.minutes_until {
        return format!("{minutes} min ago");
    }

    let hours = elapsed.num_hours();
    if hours < buckets.hours_until {
        return format!("{hours} hr ago");
    }

    let days = elapsed.num_days();
    if days < buckets.days_until {
        return if days == 1 {
            "1 day ago".to_owned()
        } else {
            format!("{days} days ago")
        };
    }

    format_date(then)
}
