use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::frequency::RecurrenceFrequency;

/// Upper bound on the recurrence walk. A schedule whose step rule fails to
/// advance (bugged persisted data) gives up after this many iterations
/// instead of spinning.
pub const MAX_PROJECTION_STEPS: usize = 512;

/// A recurring expense's schedule: the first occurrence plus the cadence.
///
/// The value is never mutated by projection; edits replace it wholesale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecurrenceSchedule {
    pub start_date: NaiveDate,
    pub frequency: RecurrenceFrequency,
}

impl RecurrenceSchedule {
    pub fn new(start_date: NaiveDate, frequency: RecurrenceFrequency) -> Self {
        Self {
            start_date,
            frequency,
        }
    }

    /// The next occurrence on or after `today`, or `None` if the walk stalls.
    pub fn next_due(&self, today: NaiveDate) -> Option<NaiveDate> {
        project_next_due_date(self.start_date, self.frequency, today)
    }
}

/// Computes the smallest date that is on/after `start_date`, on/after
/// `today`, and reachable from `start_date` by whole frequency steps.
///
/// `today` is threaded explicitly so the function stays pure; only the
/// outermost caller should consult the clock.
pub fn project_next_due_date(
    start_date: NaiveDate,
    frequency: RecurrenceFrequency,
    today: NaiveDate,
) -> Option<NaiveDate> {
    project_with_step(start_date, today, |date| frequency.next_date(date))
}

/// The guarded walk underlying `project_next_due_date`, generic over the
/// step rule so a stalled step can be exercised directly in tests.
pub fn project_with_step(
    start_date: NaiveDate,
    today: NaiveDate,
    step: impl Fn(NaiveDate) -> NaiveDate,
) -> Option<NaiveDate> {
    // A schedule that has not begun recurs first on its start date.
    if start_date >= today {
        return Some(start_date);
    }
    let mut cursor = start_date;
    let mut guard = 0usize;
    while cursor < today {
        if guard >= MAX_PROJECTION_STEPS {
            tracing::debug!(%start_date, %today, "projection guard exhausted");
            return None;
        }
        cursor = step(cursor);
        guard += 1;
    }
    Some(cursor)
}

/// String-facing entry point for raw backend records: `start_date` is an
/// ISO-8601 date (a full RFC 3339 datetime is truncated to its date) and
/// `frequency` one of the five persisted values. Every malformed input
/// degrades to `None`; the caller renders a placeholder instead.
pub fn project_from_record(
    start_date: Option<&str>,
    frequency: Option<&str>,
    today: NaiveDate,
) -> Option<NaiveDate> {
    let start = parse_calendar_date(start_date?)?;
    let frequency = RecurrenceFrequency::parse(frequency?)?;
    project_next_due_date(start, frequency, today)
}

/// Parses a date at day precision, accepting `YYYY-MM-DD` or an RFC 3339
/// datetime whose time component is discarded.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    chrono::DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn future_start_is_the_next_due_date() {
        let today = ymd(2023, 6, 1);
        for frequency in RecurrenceFrequency::ALL {
            let start = ymd(2023, 8, 15);
            assert_eq!(
                project_next_due_date(start, frequency, today),
                Some(start),
                "{frequency} schedule starting in the future"
            );
        }
    }

    #[test]
    fn start_equal_to_today_is_due_today() {
        let today = ymd(2023, 6, 1);
        assert_eq!(
            project_next_due_date(today, RecurrenceFrequency::Daily, today),
            Some(today)
        );
    }

    #[test]
    fn walk_lands_on_first_date_at_or_after_today() {
        // 03-01, 03-08, 03-15 >= 03-10.
        assert_eq!(
            project_next_due_date(
                ymd(2023, 3, 1),
                RecurrenceFrequency::Weekly,
                ymd(2023, 3, 10)
            ),
            Some(ymd(2023, 3, 15))
        );
    }

    #[test]
    fn monthly_walk_clamps_each_step_independently() {
        // Jan 31 -> Feb 28 -> Mar 31: the day-of-month is re-derived from
        // the cursor, so the clamp does not stick.
        assert_eq!(
            project_next_due_date(
                ymd(2023, 1, 31),
                RecurrenceFrequency::Monthly,
                ymd(2023, 2, 15)
            ),
            Some(ymd(2023, 2, 28))
        );
        assert_eq!(
            project_next_due_date(
                ymd(2023, 1, 31),
                RecurrenceFrequency::Monthly,
                ymd(2023, 3, 1)
            ),
            Some(ymd(2023, 3, 28))
        );
    }

    #[test]
    fn record_entry_parses_dates_and_frequencies() {
        let today = ymd(2023, 2, 15);
        assert_eq!(
            project_from_record(Some("2023-01-31"), Some("monthly"), today),
            Some(ymd(2023, 2, 28))
        );
        assert_eq!(
            project_from_record(Some("2023-01-31T08:30:00Z"), Some("monthly"), today),
            Some(ymd(2023, 2, 28))
        );
    }

    #[test]
    fn record_entry_degrades_malformed_input_to_none() {
        let today = ymd(2023, 2, 15);
        assert_eq!(project_from_record(None, Some("monthly"), today), None);
        assert_eq!(
            project_from_record(Some("2023-01-31"), Some("biannual"), today),
            None
        );
        assert_eq!(
            project_from_record(Some("not-a-date"), Some("monthly"), today),
            None
        );
        assert_eq!(project_from_record(Some("2023-01-31"), None, today), None);
    }

    #[test]
    fn stalled_step_exhausts_the_guard() {
        let result = project_with_step(ymd(2020, 1, 1), ymd(2023, 1, 1), |date| date);
        assert_eq!(result, None);
    }

    #[test]
    fn guard_bounds_very_old_daily_schedules() {
        // More than MAX_PROJECTION_STEPS daily steps away.
        let start = ymd(2000, 1, 1);
        let today = ymd(2023, 1, 1);
        assert_eq!(
            project_next_due_date(start, RecurrenceFrequency::Daily, today),
            None
        );
    }

    #[test]
    fn schedule_wrapper_delegates_to_the_projector() {
        let schedule = RecurrenceSchedule::new(ymd(2023, 1, 31), RecurrenceFrequency::Quarterly);
        assert_eq!(schedule.next_due(ymd(2023, 6, 1)), Some(ymd(2023, 7, 30)));
    }

    #[test]
    fn parse_calendar_date_truncates_datetimes() {
        assert_eq!(
            parse_calendar_date("2024-02-29T23:59:59+05:00"),
            Some(ymd(2024, 2, 29))
        );
        assert_eq!(parse_calendar_date(" 2024-02-29 "), Some(ymd(2024, 2, 29)));
        assert_eq!(parse_calendar_date("2023-02-29"), None);
        assert_eq!(parse_calendar_date(""), None);
    }
}
