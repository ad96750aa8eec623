use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The cadence of a recurring expense, persisted by the backend as one of
/// five lowercase strings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceFrequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unrecognized recurrence frequency `{0}`")]
pub struct ParseFrequencyError(pub String);

impl RecurrenceFrequency {
    pub const ALL: [RecurrenceFrequency; 5] = [
        RecurrenceFrequency::Daily,
        RecurrenceFrequency::Weekly,
        RecurrenceFrequency::Monthly,
        RecurrenceFrequency::Quarterly,
        RecurrenceFrequency::Yearly,
    ];

    /// Advances `from` by exactly one step of this cadence.
    ///
    /// Month-based steps keep the day-of-month of the date being advanced
    /// and clamp it to the target month's length (Jan 31 -> Feb 28/29).
    /// Year steps clamp the same way (Feb 29 -> Feb 28 in a common year).
    pub fn next_date(&self, from: NaiveDate) -> NaiveDate {
        match self {
            RecurrenceFrequency::Daily => from + Duration::days(1),
            RecurrenceFrequency::Weekly => from + Duration::days(7),
            RecurrenceFrequency::Monthly => shift_month(from, 1),
            RecurrenceFrequency::Quarterly => shift_month(from, 3),
            RecurrenceFrequency::Yearly => shift_year(from, 1),
        }
    }

    /// Steps one cadence backward; inverse of `next_date` up to clamping.
    pub fn previous_date(&self, from: NaiveDate) -> NaiveDate {
        match self {
            RecurrenceFrequency::Daily => from - Duration::days(1),
            RecurrenceFrequency::Weekly => from - Duration::days(7),
            RecurrenceFrequency::Monthly => shift_month(from, -1),
            RecurrenceFrequency::Quarterly => shift_month(from, -3),
            RecurrenceFrequency::Yearly => shift_year(from, -1),
        }
    }

    /// Parses one of the five persisted values, tolerating surrounding
    /// whitespace and casing. Returns `None` for anything else so callers
    /// can degrade malformed records to an empty projection.
    pub fn parse(raw: &str) -> Option<RecurrenceFrequency> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "daily" => Some(RecurrenceFrequency::Daily),
            "weekly" => Some(RecurrenceFrequency::Weekly),
            "monthly" => Some(RecurrenceFrequency::Monthly),
            "quarterly" => Some(RecurrenceFrequency::Quarterly),
            "yearly" => Some(RecurrenceFrequency::Yearly),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecurrenceFrequency::Daily => "Daily",
            RecurrenceFrequency::Weekly => "Weekly",
            RecurrenceFrequency::Monthly => "Monthly",
            RecurrenceFrequency::Quarterly => "Quarterly",
            RecurrenceFrequency::Yearly => "Yearly",
        }
    }

    /// The persisted wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceFrequency::Daily => "daily",
            RecurrenceFrequency::Weekly => "weekly",
            RecurrenceFrequency::Monthly => "monthly",
            RecurrenceFrequency::Quarterly => "quarterly",
            RecurrenceFrequency::Yearly => "yearly",
        }
    }
}

impl fmt::Display for RecurrenceFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RecurrenceFrequency {
    type Err = ParseFrequencyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        RecurrenceFrequency::parse(raw).ok_or_else(|| ParseFrequencyError(raw.to_string()))
    }
}

fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let total = date.year() * 12 + date.month() as i32 - 1 + months;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn shift_year(date: NaiveDate, years: i32) -> NaiveDate {
    let year = date.year() + years;
    let day = date.day().min(days_in_month(year, date.month()));
    NaiveDate::from_ymd_opt(year, date.month(), day).unwrap()
}

fn days_in_month(year: i32, month: u32) -> u32 {
    // Probe downward from 31; every month has at least 28 days.
    (28..=31)
        .rev()
        .find(|&day| NaiveDate::from_ymd_opt(year, month, day).is_some())
        .unwrap_or(28)
}
