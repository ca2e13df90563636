//! Expense service
//!
//! Provides business logic for expense management: validation of user input,
//! the date fallback policies, and saving after every mutation.

use chrono::NaiveDate;
use std::fmt;

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{parse_date, Expense, Money};
use crate::storage::{ExpenseSelector, Storage};

/// Input for creating a new expense
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    pub name: String,
    pub amount: Money,
    /// `YYYY-MM-DD`; missing or blank means today, unparsable falls back to today
    pub date: Option<String>,
    pub category: String,
}

/// Input for updating an expense; `None` or blank keeps the current value
#[derive(Debug, Clone, Default)]
pub struct UpdateExpenseInput {
    pub name: Option<String>,
    pub amount: Option<Money>,
    /// Unparsable dates keep the current date
    pub date: Option<String>,
    pub category: Option<String>,
}

impl UpdateExpenseInput {
    /// Whether nothing would change
    pub fn is_empty(&self) -> bool {
        is_blank(&self.name)
            && self.amount.is_none()
            && is_blank(&self.date)
            && is_blank(&self.category)
    }
}

/// A non-fatal problem with user input that was resolved by a fallback policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseWarning {
    /// A new expense's date could not be parsed; today's date was used
    DateFellBackToToday { input: String, today: NaiveDate },
    /// An updated date could not be parsed; the previous date was kept
    DateKept { input: String, kept: NaiveDate },
}

impl fmt::Display for ExpenseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DateFellBackToToday { input, today } => write!(
                f,
                "Invalid date format '{}'. Using today's date ({}) instead.",
                input, today
            ),
            Self::DateKept { input, kept } => write!(
                f,
                "Invalid date format '{}'. Keeping previous date ({}).",
                input, kept
            ),
        }
    }
}

/// Result of a mutation together with any warnings it produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    pub value: T,
    pub warnings: Vec<ExpenseWarning>,
}

impl<T> Outcome<T> {
    fn new(value: T, warnings: Vec<ExpenseWarning>) -> Self {
        for warning in &warnings {
            tracing::warn!("{}", warning);
        }
        Self { value, warnings }
    }
}

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a mut Storage,
    today: NaiveDate,
}

impl<'a> ExpenseService<'a> {
    /// Create a new expense service using the local date as "today"
    pub fn new(storage: &'a mut Storage) -> Self {
        Self::with_today(storage, chrono::Local::now().date_naive())
    }

    /// Create a new expense service with a fixed "today"
    pub fn with_today(storage: &'a mut Storage, today: NaiveDate) -> Self {
        Self { storage, today }
    }

    /// Add a new expense at the end of the list and save
    pub fn add(&mut self, input: CreateExpenseInput) -> ExpenseResult<Outcome<Expense>> {
        let mut warnings = Vec::new();

        let date = match input.date.as_deref().map(str::trim) {
            None | Some("") => self.today,
            Some(raw) => parse_date(raw).unwrap_or_else(|_| {
                warnings.push(ExpenseWarning::DateFellBackToToday {
                    input: raw.to_string(),
                    today: self.today,
                });
                self.today
            }),
        };

        let expense = self
            .storage
            .expenses
            .create(&input.name, input.amount, date, &input.category)?
            .clone();

        self.storage.save_all()?;

        tracing::info!(id = %expense.id(), "expense added");
        Ok(Outcome::new(expense, warnings))
    }

    /// Update an expense and save
    ///
    /// Every provided value is validated before anything changes, so a
    /// rejected update leaves the expense as it was.
    pub fn update(
        &mut self,
        selector: ExpenseSelector,
        input: UpdateExpenseInput,
    ) -> ExpenseResult<Outcome<Expense>> {
        let index = self.storage.expenses.index_of(selector)?;
        let before = &self.storage.expenses.get_all()?[index];
        let mut expense = before.clone();
        let mut warnings = Vec::new();

        if let Some(name) = non_blank(&input.name) {
            expense.set_name(name).map_err(validation)?;
        }

        if let Some(amount) = input.amount {
            expense.set_amount(amount).map_err(validation)?;
        }

        if let Some(raw) = non_blank(&input.date) {
            match parse_date(raw) {
                Ok(date) => expense.set_date(date),
                Err(_) => warnings.push(ExpenseWarning::DateKept {
                    input: raw.to_string(),
                    kept: expense.date(),
                }),
            }
        }

        if let Some(category) = non_blank(&input.category) {
            expense.set_category(category).map_err(validation)?;
        }

        self.storage.expenses.replace(index, expense.clone())?;
        self.storage.save_all()?;

        tracing::info!(id = %expense.id(), "expense updated");
        Ok(Outcome::new(expense, warnings))
    }

    /// Delete an expense and save
    pub fn delete(&mut self, selector: ExpenseSelector) -> ExpenseResult<Expense> {
        let expense = self.storage.expenses.remove(selector)?;
        self.storage.save_all()?;

        tracing::info!(id = %expense.id(), "expense deleted");
        Ok(expense)
    }

    /// Get a single expense
    pub fn get(&self, selector: ExpenseSelector) -> ExpenseResult<&Expense> {
        self.storage.expenses.get(selector)
    }

    /// List all expenses in insertion order
    pub fn list(&self) -> ExpenseResult<&[Expense]> {
        self.storage.expenses.get_all()
    }
}

fn validation(e: impl fmt::Display) -> ExpenseError {
    ExpenseError::Validation(e.to_string())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn is_blank(value: &Option<String>) -> bool {
    non_blank(value).is_none()
}
