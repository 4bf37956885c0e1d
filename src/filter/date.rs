//! Timestamp parsing and inclusive date ranges.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a record timestamp to an instant.
///
/// Accepts RFC 3339, naive date-times (taken as UTC) and bare dates
/// (midnight UTC). Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

/// Inclusive instant range; an absent bound is unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    /// The unbounded range.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        Self { from, to }
    }

    /// Range over calendar days, as picked in a date input. The `to` day is
    /// covered through its last millisecond.
    pub fn days(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        let from = from.map(|d| d.and_time(NaiveTime::MIN).and_utc());
        let to = to.map(|d| {
            d.and_time(NaiveTime::MIN).and_utc() + TimeDelta::days(1) - TimeDelta::milliseconds(1)
        });
        Self { from, to }
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| instant >= from) && self.to.map_or(true, |to| instant <= to)
    }

    /// Match a raw timestamp against the range.
    ///
    /// With no bounds every record matches, including ones without a
    /// timestamp. With any bound present, a missing or malformed timestamp
    /// does not match.
    pub fn matches_raw(&self, raw: Option<&str>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        raw.and_then(parse_timestamp)
            .is_some_and(|instant| self.contains(instant))
    }
}
