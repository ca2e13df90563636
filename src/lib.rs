//! Expense Tracker - terminal-based personal expense tracking
//!
//! This library provides the core functionality for a single-user expense
//! tracker. Expenses are kept in memory in insertion order and persisted to a
//! flat comma-separated file after every change.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Data directory resolution and user settings
//! - `error`: Custom error types
//! - `models`: Core data models (expenses, ids, money, summaries)
//! - `storage`: Flat-file storage layer
//! - `services`: Business logic layer
//! - `display`: Terminal formatting
//! - `cli`: One-shot commands and the interactive menu
//! - `logging`: tracing subscriber setup
//!
//! # Example
//!
//! ```rust,ignore
//! use expense_tracker::config::TrackerPaths;
//! use expense_tracker::services::SummaryService;
//! use expense_tracker::storage::Storage;
//!
//! let (storage, _report) = Storage::open(TrackerPaths::new())?;
//! let summary = SummaryService::new(&storage).summary()?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

pub use error::ExpenseError;
