//! CLI command handlers
//!
//! This module contains the implementation of CLI commands and the
//! interactive menu, bridging clap argument parsing with the service layer.

pub mod expense;
pub mod menu;

pub use expense::{handle_expense_command, parse_amount, ExpenseCommands};
pub use menu::{run_menu, Menu};
