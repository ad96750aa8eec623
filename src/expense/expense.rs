use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schedule::{RecurrenceFrequency, RecurrenceSchedule};

/// A single expense record as the administration console stores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub item_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchased_from: Option<String>,
    pub purchase_date: NaiveDate,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchased_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub recurrence: Option<RecurrenceSchedule>,
    /// Cached projection, refreshed whenever the record is redisplayed.
    #[serde(default)]
    pub next_due: Option<NaiveDate>,
    pub status: ExpenseStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ExpenseStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl Expense {
    pub fn new(item_name: impl Into<String>, purchase_date: NaiveDate, amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_name: item_name.into(),
            purchased_from: None,
            purchase_date,
            amount,
            purchased_by: None,
            notes: None,
            recurrence: None,
            next_due: None,
            status: ExpenseStatus::Pending,
        }
    }

    /// Marks the expense recurring from its purchase date.
    pub fn with_recurrence(mut self, frequency: RecurrenceFrequency) -> Self {
        self.set_recurrence(Some(RecurrenceSchedule::new(self.purchase_date, frequency)));
        self
    }

    /// Replaces the schedule. The anchor is pinned to the purchase date so a
    /// stale start date from an edited record cannot drift the series.
    pub fn set_recurrence(&mut self, mut recurrence: Option<RecurrenceSchedule>) {
        if let Some(schedule) = recurrence.as_mut() {
            if schedule.start_date != self.purchase_date {
                schedule.start_date = self.purchase_date;
            }
        }
        self.recurrence = recurrence;
        self.next_due = None;
    }

    /// Ends the recurrence; the record stays, projections stop.
    pub fn end_recurrence(&mut self) {
        self.recurrence = None;
        self.next_due = None;
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    /// Recomputes the cached due date against `today`. Returns the new value.
    pub fn refresh_next_due(&mut self, today: NaiveDate) -> Option<NaiveDate> {
        self.next_due = self
            .recurrence
            .as_ref()
            .and_then(|schedule| schedule.next_due(today));
        self.next_due
    }
}
