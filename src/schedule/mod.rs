//! Recurrence cadences and the due-date projection walk.

pub mod frequency;
pub mod projector;

pub use frequency::{ParseFrequencyError, RecurrenceFrequency};
pub use projector::{
    parse_calendar_date, project_from_record, project_next_due_date, project_with_step,
    RecurrenceSchedule, MAX_PROJECTION_STEPS,
};
