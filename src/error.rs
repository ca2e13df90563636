//! Custom error types for the expense tracker
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

use crate::models::AmountOverflow;

/// The main error type for expense tracker operations
#[derive(Error, Debug)]
pub enum ExpenseError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Validation errors for user-supplied values
    #[error("Validation error: {0}")]
    Validation(String),

    /// A position or id that does not match any expense
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// Month number outside 1-12
    #[error("Invalid month: {0} (expected 1-12)")]
    InvalidMonth(u32),

    /// Storage errors (data file cannot be created, read or written)
    #[error("Storage error: {0}")]
    Storage(String),

    /// The store was used before its data file was loaded
    #[error("Expense store is not ready: data has not been loaded")]
    NotReady,
}

impl ExpenseError {
    /// Create an "invalid selection" error for a position in the listing
    pub fn position_not_found(position: usize, len: usize) -> Self {
        Self::InvalidSelection(format!(
            "no expense at position {} ({} expense(s) recorded)",
            position, len
        ))
    }

    /// Create an "invalid selection" error for an expense id
    pub fn id_not_found(identifier: impl std::fmt::Display) -> Self {
        Self::InvalidSelection(format!("no expense with id {}", identifier))
    }

    /// Check if this is an invalid selection error
    pub fn is_invalid_selection(&self) -> bool {
        matches!(self, Self::InvalidSelection(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for ExpenseError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<AmountOverflow> for ExpenseError {
    fn from(err: AmountOverflow) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Result type alias for expense tracker operations
pub type ExpenseResult<T> = Result<T, ExpenseError>;
