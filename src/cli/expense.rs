//! Expense CLI commands
//!
//! Implements the one-shot CLI commands for expense management.

use chrono::Datelike;
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{
    format_category_report, format_expense_details, format_expense_list, format_money,
    format_monthly_summary, format_summary,
};
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::Money;
use crate::services::{
    CreateExpenseInput, ExpenseService, ExpenseWarning, SummaryService, UpdateExpenseInput,
};
use crate::storage::{ExpenseSelector, Storage};

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a new expense
    Add {
        /// Description of the expense
        name: String,
        /// Amount (e.g. 3.50)
        amount: String,
        /// Category
        category: String,
        /// Date of the expense (YYYY-MM-DD); defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Edit an expense; omitted fields keep their current value
    Edit {
        /// Position in the list (e.g. 2) or id (e.g. #7)
        expense: String,
        /// New description
        #[arg(short, long)]
        name: Option<String>,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Delete an expense
    Delete {
        /// Position in the list (e.g. 2) or id (e.g. #7)
        expense: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
    /// List all expenses
    #[command(alias = "ls")]
    List,
    /// Show expense details
    Show {
        /// Position in the list (e.g. 2) or id (e.g. #7)
        expense: String,
    },
    /// Show the number and total of expenses
    Summary {
        /// Only count expenses in this month (1-12)
        #[arg(short, long)]
        month: Option<u32>,
        /// Year of the month; defaults to the current year
        #[arg(short, long, requires = "month")]
        year: Option<i32>,
    },
    /// List the expenses in a category
    Category {
        /// Category name (case-insensitive)
        name: String,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &mut Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> ExpenseResult<()> {
    match cmd {
        ExpenseCommands::Add {
            name,
            amount,
            category,
            date,
        } => {
            let amount = parse_amount(&amount)?;
            let mut service = ExpenseService::new(storage);
            let outcome = service.add(CreateExpenseInput {
                name,
                amount,
                date,
                category,
            })?;

            print_warnings(&outcome.warnings);
            println!(
                "Added expense #{}: {} {} ({})",
                outcome.value.id(),
                outcome.value.name(),
                format_money(outcome.value.amount(), settings),
                outcome.value.category()
            );
        }

        ExpenseCommands::Edit {
            expense,
            name,
            amount,
            date,
            category,
        } => {
            let selector: ExpenseSelector = expense.parse()?;
            let amount = match amount.as_deref().map(str::trim) {
                None | Some("") => None,
                Some(raw) => Some(parse_amount(raw)?),
            };
            let input = UpdateExpenseInput {
                name,
                amount,
                date,
                category,
            };

            if input.is_empty() {
                println!("Nothing to update. Use --name, --amount, --date or --category.");
                return Ok(());
            }

            let mut service = ExpenseService::new(storage);
            let outcome = service.update(selector, input)?;

            print_warnings(&outcome.warnings);
            println!("Updated expense #{}", outcome.value.id());
            print!("{}", format_expense_details(&outcome.value, settings));
        }

        ExpenseCommands::Delete { expense, force } => {
            let selector: ExpenseSelector = expense.parse()?;
            let mut service = ExpenseService::new(storage);

            if !force {
                let target = service.get(selector)?;
                println!("About to delete expense: {}", target);
                println!("Use --force to confirm deletion");
                return Ok(());
            }

            let deleted = service.delete(selector)?;
            println!("Deleted expense #{}: {}", deleted.id(), deleted.name());
        }

        ExpenseCommands::List => {
            let service = ExpenseService::new(storage);
            print!("{}", format_expense_list(service.list()?, settings));
        }

        ExpenseCommands::Show { expense } => {
            let selector: ExpenseSelector = expense.parse()?;
            let service = ExpenseService::new(storage);
            print!("{}", format_expense_details(service.get(selector)?, settings));
        }

        ExpenseCommands::Summary { month, year } => {
            let service = SummaryService::new(storage);
            match month {
                Some(month) => {
                    let year = year.unwrap_or_else(|| chrono::Local::now().year());
                    let monthly = service.summary_for_month(year, month)?;
                    print!("{}", format_monthly_summary(&monthly, settings));
                }
                None => {
                    let summary = service.summary()?;
                    print!("{}", format_summary(summary.as_ref(), settings));
                }
            }
        }

        ExpenseCommands::Category { name } => {
            let service = SummaryService::new(storage);
            let report = service.filter_by_category(&name)?;
            print!("{}", format_category_report(&report, settings));
        }
    }

    Ok(())
}

/// Parse user-entered amount text into a positive amount
pub fn parse_amount(raw: &str) -> ExpenseResult<Money> {
    let amount = Money::parse(raw)
        .map_err(|e| ExpenseError::Validation(format!("Invalid amount '{}': {}", raw.trim(), e)))?;
    if !amount.is_positive() {
        return Err(ExpenseError::Validation(format!(
            "Amount must be greater than zero (got {})",
            raw.trim()
        )));
    }
    Ok(amount)
}

fn print_warnings(warnings: &[ExpenseWarning]) {
    for warning in warnings {
        println!("Warning: {}", warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("3.50").unwrap(), Money::from_cents(350));
        assert_eq!(parse_amount(" 12 ").unwrap(), Money::from_cents(1200));
        assert!(parse_amount("abc").unwrap_err().is_validation());
        assert!(parse_amount("0").unwrap_err().is_validation());
        assert!(parse_amount("-2.00").unwrap_err().is_validation());
        assert!(parse_amount("1.234").unwrap_err().is_validation());
    }
}
