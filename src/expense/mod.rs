//! Expense records and the per-company register that holds them.

pub mod expense;
pub mod register;

pub use expense::{Expense, ExpenseStatus};
pub use register::{DueStatus, ExpenseRegister};
