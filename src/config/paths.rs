//! Path management for the expense tracker
//!
//! ## Path Resolution Order
//!
//! 1. An explicit base directory (the `--data-dir` flag)
//! 2. `EXPENSE_TRACKER_DATA_DIR` environment variable (if set)
//! 3. `csv_data` relative to the current working directory

use std::path::PathBuf;

use crate::error::ExpenseError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "EXPENSE_TRACKER_DATA_DIR";

/// Default base directory, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = "csv_data";

/// Name of the persisted expenses file
pub const EXPENSES_FILE_NAME: &str = "expenses.csv";

/// Manages all paths used by the expense tracker
#[derive(Debug, Clone)]
pub struct TrackerPaths {
    /// Base directory for all tracker data
    base_dir: PathBuf,
}

impl TrackerPaths {
    /// Create a new TrackerPaths instance
    ///
    /// Uses `EXPENSE_TRACKER_DATA_DIR` when set, otherwise `csv_data`.
    pub fn new() -> Self {
        let base_dir = std::env::var(DATA_DIR_ENV)
            .ok()
            .filter(|custom| !custom.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        Self { base_dir }
    }

    /// Create TrackerPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Resolve paths from an optional explicit directory, falling back to [`TrackerPaths::new`]
    pub fn resolve(explicit: Option<PathBuf>) -> Self {
        match explicit {
            Some(dir) => Self::with_base_dir(dir),
            None => Self::new(),
        }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the persisted expenses file
    pub fn expenses_file(&self) -> PathBuf {
        self.base_dir.join(EXPENSES_FILE_NAME)
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Ensure the base directory exists
    ///
    /// Returns `true` when the directory had to be created.
    pub fn ensure_directories(&self) -> Result<bool, ExpenseError> {
        if self.base_dir.is_dir() {
            tracing::debug!(dir = %self.base_dir.display(), "data directory already exists");
            return Ok(false);
        }

        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| ExpenseError::Io(format!("Failed to create data directory: {}", e)))?;
        tracing::info!(dir = %self.base_dir.display(), "created data directory");

        Ok(true)
    }

    /// Check if the tracker has been initialized (settings file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

impl Default for TrackerPaths {
    fn default() -> Self {
        Self::new()
    }
}
