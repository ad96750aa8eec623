//! Argument-driven command surface for the `expense_core_cli` binary.

use std::{env, path::PathBuf};

use chrono::{NaiveDate, Utc};
use colored::Colorize;

use crate::config::{Config, ConfigManager};
use crate::errors::ExpenseError;
use crate::expense::{DueStatus, ExpenseRegister};
use crate::schedule::{parse_calendar_date, project_from_record};
use crate::storage::{load_register_from_path, save_register_to_path};

const NOT_SET: &str = "Not set";

pub fn run_cli() -> Result<(), ExpenseError> {
    let args: Vec<String> = env::args().skip(1).collect();
    run_with_args(&args)
}

fn run_with_args(args: &[String]) -> Result<(), ExpenseError> {
    let mut args = args.iter();
    let command = match args.next() {
        Some(command) => command.as_str(),
        None => {
            print_usage();
            return Err(ExpenseError::InvalidInput("missing command".into()));
        }
    };
    let config = load_config_or_default();

    match command {
        "new" => {
            let name = next_arg(&mut args, "new <name>")?;
            let register = ExpenseRegister::new(name);
            println!("{}", serde_json::to_string_pretty(&register)?);
        }
        "load" => {
            let path = PathBuf::from(next_arg(&mut args, "load <path>")?);
            let register = load_register_from_path(&path)?;
            println!("{}", serde_json::to_string_pretty(&register)?);
        }
        "due" => {
            let path = PathBuf::from(next_arg(&mut args, "due <path> [today]")?);
            let today = parse_today(args.next().map(String::as_str))?;
            let mut register = load_register_from_path(&path)?;
            register.refresh_due_dates(today);
            print_due_table(&register, today, &config);
            save_register_to_path(&register, &path)?;
        }
        "preview" => {
            let start = next_arg(&mut args, "preview <start-date> <frequency> [today]")?;
            let frequency = next_arg(&mut args, "preview <start-date> <frequency> [today]")?;
            let today = parse_today(args.next().map(String::as_str))?;
            match project_from_record(Some(start), Some(frequency), today) {
                Some(date) => println!("{}", date.format(&config.date_format)),
                None => println!("{NOT_SET}"),
            }
        }
        _ => {
            print_usage();
            return Err(ExpenseError::InvalidInput(format!(
                "unknown command `{command}`"
            )));
        }
    }

    Ok(())
}

fn next_arg<'a>(
    args: &mut impl Iterator<Item = &'a String>,
    usage: &str,
) -> Result<&'a str, ExpenseError> {
    args.next()
        .map(String::as_str)
        .ok_or_else(|| ExpenseError::InvalidInput(format!("usage: expense_core_cli {usage}")))
}

/// The only place the system clock is consulted; everything below receives
/// an explicit date.
fn parse_today(raw: Option<&str>) -> Result<NaiveDate, ExpenseError> {
    match raw {
        Some(value) => parse_calendar_date(value)
            .ok_or_else(|| ExpenseError::InvalidInput(format!("unparsable date `{value}`"))),
        None => Ok(Utc::now().date_naive()),
    }
}

fn load_config_or_default() -> Config {
    ConfigManager::new()
        .and_then(|manager| manager.load())
        .unwrap_or_else(|err| {
            tracing::warn!(%err, "falling back to default config");
            Config::default()
        })
}

fn print_due_table(register: &ExpenseRegister, today: NaiveDate, config: &Config) {
    println!(
        "Recurring expenses for {} (as of {}):",
        register.name.bold(),
        today.format(&config.date_format)
    );
    let mut any = false;
    for expense in register.expenses.iter().filter(|e| e.is_recurring()) {
        any = true;
        let frequency = expense
            .recurrence
            .as_ref()
            .map(|schedule| schedule.frequency.label())
            .unwrap_or("-");
        let (due, status) = match expense.next_due {
            Some(date) => (
                date.format(&config.date_format).to_string(),
                render_status(DueStatus::classify(date, today)),
            ),
            None => (NOT_SET.to_string(), NOT_SET.dimmed().to_string()),
        };
        println!(
            "  {:<28} {:<10} {:>10.2} {}  due {}  [{}]",
            expense.item_name, frequency, expense.amount, config.currency, due, status
        );
    }
    if !any {
        println!("  (no recurring expenses)");
    }
}

fn render_status(status: DueStatus) -> String {
    match status {
        DueStatus::Overdue => "Overdue".red().bold().to_string(),
        DueStatus::DueSoon => "Due soon".yellow().to_string(),
        DueStatus::Upcoming => "Upcoming".green().to_string(),
    }
}

fn print_usage() {
    eprintln!("Usage: expense_core_cli <command>");
    eprintln!("  new <name>                                Print an empty register as JSON");
    eprintln!("  load <path>                               Load and reprint a register");
    eprintln!("  due <path> [today]                        Refresh and list next due dates");
    eprintln!("  preview <start-date> <frequency> [today]  Project a single schedule");
}
