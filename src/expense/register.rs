use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::expense::Expense;

const CURRENT_SCHEMA_VERSION: u8 = 1;
const DUE_SOON_WINDOW_DAYS: i64 = 7;

/// How a cached due date relates to the reference date. `Overdue` only
/// appears when a register was saved with projections computed against an
/// earlier "today" and has not been refreshed since.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    Overdue,
    DueSoon,
    Upcoming,
}

impl DueStatus {
    pub fn classify(due: NaiveDate, reference: NaiveDate) -> DueStatus {
        if due < reference {
            return DueStatus::Overdue;
        }
        if due <= reference + Duration::days(DUE_SOON_WINDOW_DAYS) {
            DueStatus::DueSoon
        } else {
            DueStatus::Upcoming
        }
    }
}

/// A named collection of expense records for one company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseRegister {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "ExpenseRegister::schema_version_default")]
    pub schema_version: u8,
}

impl ExpenseRegister {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            expenses: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn add_expense(&mut self, expense: Expense) -> Uuid {
        let id = expense.id;
        self.expenses.push(expense);
        self.touch();
        id
    }

    pub fn expense(&self, id: Uuid) -> Option<&Expense> {
        self.expenses.iter().find(|expense| expense.id == id)
    }

    pub fn expense_mut(&mut self, id: Uuid) -> Option<&mut Expense> {
        self.expenses.iter_mut().find(|expense| expense.id == id)
    }

    pub fn remove_expense(&mut self, id: Uuid) -> Option<Expense> {
        let index = self.expenses.iter().position(|expense| expense.id == id)?;
        let removed = self.expenses.remove(index);
        self.touch();
        Some(removed)
    }

    pub fn expense_count(&self) -> usize {
        self.expenses.len()
    }

    /// Recomputes every recurring expense's cached due date against `today`.
    /// Returns how many records carry a projection afterwards.
    pub fn refresh_due_dates(&mut self, today: NaiveDate) -> usize {
        let mut projected = 0usize;
        for expense in self.expenses.iter_mut().filter(|e| e.is_recurring()) {
            if expense.refresh_next_due(today).is_some() {
                projected += 1;
            }
        }
        self.touch();
        tracing::debug!(register = %self.name, projected, "refreshed due dates");
        projected
    }

    /// Recurring expenses due within `days` of `today`, soonest first.
    /// Assumes `refresh_due_dates` ran against the same reference.
    pub fn due_within(&self, today: NaiveDate, days: i64) -> Vec<&Expense> {
        let cutoff = today + Duration::days(days);
        let mut due: Vec<&Expense> = self
            .expenses
            .iter()
            .filter(|expense| {
                expense
                    .next_due
                    .map(|date| date <= cutoff)
                    .unwrap_or(false)
            })
            .collect();
        due.sort_by_key(|expense| expense.next_due);
        due
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}
