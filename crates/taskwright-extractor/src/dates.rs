//! Deterministic resolution of completion-date phrases
//!
//! The model is only allowed to emit a literal `YYYY-MM-DD` date or one of
//! [`SUPPORTED_PHRASES`]; everything else resolves to [`DateResolution::Unclear`].
//! The anchor ("today") is always supplied by the caller and results are
//! localized to one fixed offset, never the host's local zone.

use chrono::{
    DateTime, Datelike, Days, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, Utc,
};
use regex::Regex;
use std::sync::OnceLock;

/// Relative phrases the resolver understands, as shown to the model
pub const SUPPORTED_PHRASES: &[&str] = &[
    "today",
    "tomorrow",
    "day after tomorrow",
    "next week",
    "end of week",
    "next month",
    "end of month",
    "in N days",
];

/// Naive date-time shapes, localized into the resolver's offset
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

static IN_N_DAYS: OnceLock<Regex> = OnceLock::new();

fn in_n_days() -> &'static Regex {
    IN_N_DAYS.get_or_init(|| Regex::new(r"^in\s+(\d+)\s+days?$").expect("IN_N_DAYS is valid"))
}

/// Outcome of resolving a date phrase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateResolution {
    /// Midnight of the resolved day in the resolver's offset
    Resolved(DateTime<FixedOffset>),

    /// The phrase matched no rule
    Unclear,
}

impl DateResolution {
    /// The resolved timestamp, if any
    pub fn datetime(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            DateResolution::Resolved(dt) => Some(*dt),
            DateResolution::Unclear => None,
        }
    }

    /// Whether no rule matched
    pub fn is_unclear(&self) -> bool {
        matches!(self, DateResolution::Unclear)
    }
}

/// Resolves date phrases against an explicit anchor date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateResolver {
    offset: FixedOffset,
}

impl DateResolver {
    /// Create a resolver that localizes into `offset`
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Create a resolver that localizes into UTC
    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    /// The fixed offset results are localized to
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Resolve `phrase` relative to `anchor`
    ///
    /// Date-time literals are taken as given: RFC 3339 values keep their own
    /// offset, naive ones are read in the resolver's offset.
    pub fn resolve(&self, phrase: &str, anchor: NaiveDate) -> DateResolution {
        self.parse_datetime_literal(phrase)
            .or_else(|| Self::resolve_date(phrase, anchor).and_then(|date| self.localize(date)))
            .map_or(DateResolution::Unclear, DateResolution::Resolved)
    }

    /// Parse an ISO 8601 date-time, with or without an offset
    pub fn parse_datetime_literal(&self, value: &str) -> Option<DateTime<FixedOffset>> {
        let value = value.trim();
        if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
            return Some(datetime);
        }
        NAIVE_DATETIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
            .and_then(|naive| naive.and_local_timezone(self.offset).single())
    }

    /// Calendar part of [`resolve`](Self::resolve), without localization
    ///
    /// Phrases are trimmed and compared case-insensitively. Returns `None`
    /// for unknown phrases and for results outside chrono's calendar range.
    pub fn resolve_date(phrase: &str, anchor: NaiveDate) -> Option<NaiveDate> {
        let phrase = phrase.trim().to_lowercase();

        match phrase.as_str() {
            "today" => Some(anchor),
            "tomorrow" => add_days(anchor, 1),
            "day after tomorrow" => add_days(anchor, 2),
            "end of week" => end_of_week(anchor),
            // Sunday of the following week: never the anchor, never equal to "end of week"
            "next week" => end_of_week(anchor).and_then(|sunday| add_days(sunday, 7)),
            "next month" => first_of_next_month(anchor),
            "end of month" => first_of_next_month(anchor).and_then(|d| d.pred_opt()),
            other => {
                if let Some(caps) = in_n_days().captures(other) {
                    let n: u64 = caps[1].parse().ok()?;
                    return add_days(anchor, n);
                }
                NaiveDate::parse_from_str(other, "%Y-%m-%d")
                    .ok()
                    .filter(|_| is_iso_literal(other))
            }
        }
    }

    /// Midnight of `date` in the resolver's offset
    pub fn localize(&self, date: NaiveDate) -> Option<DateTime<FixedOffset>> {
        date.and_time(NaiveTime::MIN)
            .and_local_timezone(self.offset)
            .single()
    }
}

impl Default for DateResolver {
    fn default() -> Self {
        Self::utc()
    }
}

/// Whether `value` has the exact `YYYY-MM-DD` shape
pub fn is_iso_literal(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

fn add_days(date: NaiveDate, n: u64) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(n))
}

// weekday: 0 = Monday .. 6 = Sunday
fn end_of_week(anchor: NaiveDate) -> Option<NaiveDate> {
    let weekday = anchor.weekday().num_days_from_monday() as u64;
    add_days(anchor, 6 - weekday)
}

fn first_of_next_month(anchor: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if anchor.month() == 12 {
        (anchor.year().checked_add(1)?, 1)
    } else {
        (anchor.year(), anchor.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}
