//! Source query models.

use chrono::{DateTime, Duration, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::PublisherId;

/// Half-open time window `[started_at, ended_at)` for a catalog query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TimeWindow {
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(started_at: DateTime<Utc>, ended_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            ended_at,
        }
    }

    /// Window covering the `hours` before `now`, clamped at the earliest
    /// representable time.
    pub fn trailing_hours(now: DateTime<Utc>, hours: u32) -> Self {
        let started_at = now
            .checked_sub_signed(Duration::hours(i64::from(hours)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self {
            started_at,
            ended_at: now,
        }
    }

    /// Check whether a timestamp falls inside the window.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.started_at && at < self.ended_at
    }
}

/// What a single catalog query is narrowed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SourceFilter {
    /// Topic/category id (game id on Helix)
    Topic(String),
    /// Publisher id (broadcaster id on Helix)
    Publisher(PublisherId),
}

impl fmt::Display for SourceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFilter::Topic(id) => write!(f, "topic:{}", id),
            SourceFilter::Publisher(id) => write!(f, "publisher:{}", id),
        }
    }
}

/// One catalog query: a single filter over a bounded time window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SourceQuery {
    pub filter: SourceFilter,
    pub window: TimeWindow,
}

impl SourceQuery {
    pub fn topic(id: impl Into<String>, window: TimeWindow) -> Self {
        Self {
            filter: SourceFilter::Topic(id.into()),
            window,
        }
    }

    pub fn publisher(id: impl Into<PublisherId>, window: TimeWindow) -> Self {
        Self {
            filter: SourceFilter::Publisher(id.into()),
            window,
        }
    }
}

impl fmt::Display for SourceQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{} .. {})",
            self.filter,
            self.window.started_at.to_rfc3339(),
            self.window.ended_at.to_rfc3339()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_trailing_window() {
        let now = Utc.with_ymd_and_hms(2024, 2, 26, 12, 0, 0).unwrap();
        let window = TimeWindow::trailing_hours(now, 24);
        assert_eq!(window.started_at, Utc.with_ymd_and_hms(2024, 2, 25, 12, 0, 0).unwrap());
        assert!(window.contains(now - Duration::hours(1)));
        assert!(!window.contains(now));
    }

    #[test]
    fn test_trailing_window_clamps_huge_spans() {
        let now = Utc.with_ymd_and_hms(2024, 2, 26, 12, 0, 0).unwrap();
        let window = TimeWindow::trailing_hours(now, u32::MAX);
        assert_eq!(window.started_at, DateTime::<Utc>::MIN_UTC);
        assert_eq!(window.ended_at, now);
    }

    #[test]
    fn test_filter_display() {
        assert_eq!(SourceFilter::Topic("509658".into()).to_string(), "topic:509658");
        assert_eq!(
            SourceFilter::Publisher(PublisherId::from("42")).to_string(),
            "publisher:42"
        );
    }
}
