//! Core data types
//!
//! A `SessionRecord` is one row of the session log. It is built from a
//! finished timer session plus the wall-clock time at which it ended.

use chrono::{DateTime, FixedOffset, NaiveDate, Timelike};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

use crate::consts::DATE_FORMAT;
use crate::timer::{FinishedSession, format_elapsed, parse_elapsed};

/// Coarse time-of-day bucket assigned at finish time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) enum Shift {
    Morning,
    Afternoon,
    Evening,
}

impl Shift {
    /// 06-11 Morning, 12-17 Afternoon, anything else Evening
    pub(crate) fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => Shift::Morning,
            12..=17 => Shift::Afternoon,
            _ => Shift::Evening,
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Shift::Morning => "Morning",
            Shift::Afternoon => "Afternoon",
            Shift::Evening => "Evening",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Morning" => Some(Shift::Morning),
            "Afternoon" => Some(Shift::Afternoon),
            "Evening" => Some(Shift::Evening),
            _ => None,
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finished study session as stored in the log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct SessionRecord {
    #[serde(serialize_with = "serialize_date")]
    pub(crate) date: NaiveDate,
    pub(crate) shift: Shift,
    pub(crate) topic: String,
    /// Formatted as `HH:MM:SS`
    pub(crate) duration: String,
}

fn serialize_date<S: serde::Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&date.format(DATE_FORMAT))
}

impl SessionRecord {
    pub(crate) fn from_finished(session: FinishedSession, ended_at: DateTime<FixedOffset>) -> Self {
        Self {
            date: ended_at.date_naive(),
            shift: Shift::from_hour(ended_at.hour()),
            topic: session.topic,
            duration: format_elapsed(session.elapsed),
        }
    }

    /// Build a record from the four CSV columns. `None` if any field is malformed.
    pub(crate) fn from_fields(fields: &[String]) -> Option<Self> {
        let [date, shift, topic, duration] = fields else {
            return None;
        };
        let date = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).ok()?;
        let shift = Shift::parse(shift)?;
        parse_elapsed(duration)?;
        Some(Self {
            date,
            shift,
            topic: topic.clone(),
            duration: duration.trim().to_string(),
        })
    }

    pub(crate) fn to_fields(&self) -> [String; 4] {
        [
            self.date.format(DATE_FORMAT).to_string(),
            self.shift.to_string(),
            self.topic.clone(),
            self.duration.clone(),
        ]
    }

    pub(crate) fn elapsed(&self) -> Duration {
        parse_elapsed(&self.duration).unwrap_or_default()
    }
}

/// Date filter for queries
#[derive(Debug, Clone, Default)]
pub(crate) struct DateFilter {
    pub(crate) since: Option<NaiveDate>,
    pub(crate) until: Option<NaiveDate>,
}

impl DateFilter {
    pub(crate) fn new(since: Option<NaiveDate>, until: Option<NaiveDate>) -> Self {
        Self { since, until }
    }

    pub(crate) fn contains(&self, date: NaiveDate) -> bool {
        if let Some(s) = self.since
            && date < s
        {
            return false;
        }
        if let Some(u) = self.until
            && date > u
        {
            return false;
        }
        true
    }
}

/// Records read back from the log
#[derive(Debug, Default)]
pub(crate) struct LoadResult {
    pub(crate) records: Vec<SessionRecord>,
    /// Malformed rows that were ignored
    pub(crate) skipped: usize,
}

impl LoadResult {
    /// Sum of all durations, saturating at `Duration::MAX`
    pub(crate) fn total_elapsed(&self) -> Duration {
        self.records
            .iter()
            .map(SessionRecord::elapsed)
            .try_fold(Duration::ZERO, |acc, d| acc.checked_add(d))
            .unwrap_or(Duration::MAX)
    }
}
