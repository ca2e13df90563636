//! Service layer for the expense tracker
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, input fallback policies, and summaries.

pub mod expense;
pub mod summary;

pub use expense::{
    CreateExpenseInput, ExpenseService, ExpenseWarning, Outcome, UpdateExpenseInput,
};
pub use summary::SummaryService;
