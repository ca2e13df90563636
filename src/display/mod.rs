//! Display formatting for terminal output
//!
//! Provides utilities for formatting expenses and summaries for terminal
//! display.

pub mod expense;

pub use expense::{
    format_category_report, format_date, format_expense_details, format_expense_list,
    format_expense_row, format_money, format_monthly_summary, format_summary,
};
