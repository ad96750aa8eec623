#![doc(test(attr(deny(warnings))))]

//! Expense Core provides the recurring-expense scheduling primitives behind
//! an HR administration console: recurrence cadences, the next-due-date
//! projection walk, and the expense register they operate on.

pub mod cli;
pub mod config;
pub mod errors;
pub mod expense;
pub mod schedule;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Expense Core tracing initialized.");
    });
}
