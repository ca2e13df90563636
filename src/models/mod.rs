//! Core data models for the expense tracker
//!
//! This module contains the data structures that represent the expense
//! domain: expenses, their ids, money amounts and summaries.

pub mod expense;
pub mod ids;
pub mod money;
pub mod summary;

pub use expense::{
    parse_date, validate_category, validate_name, Expense, ExpenseValidationError, LineError,
};
pub use ids::{ExpenseId, IdSequence};
pub use money::{AmountOverflow, Money, MoneyParseError};
pub use summary::{CategoryReport, MonthlySummary, Summary};
