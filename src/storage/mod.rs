//! Storage layer for the expense tracker
//!
//! Provides the flat-file expense repository, atomic writes and automatic
//! directory and file creation.

pub mod expenses;
pub mod file_io;

pub use expenses::{
    ExpenseRepository, ExpenseSelector, LoadReport, SkipReason, SkippedLine, StoreState,
};
pub use file_io::{ensure_file, read_delimited, write_delimited_atomic};

use crate::config::paths::TrackerPaths;
use crate::error::ExpenseError;

/// Main storage coordinator that provides access to the repositories
pub struct Storage {
    pub expenses: ExpenseRepository,
}

impl Storage {
    /// Create a new Storage instance
    ///
    /// Confirms or creates the data directory and the expenses file. The
    /// repository stays uninitialized until [`Storage::load_all`] runs.
    pub fn new(paths: TrackerPaths) -> Result<Self, ExpenseError> {
        paths.ensure_directories()?;

        let expenses_file = paths.expenses_file();
        if ensure_file(&expenses_file)? {
            tracing::info!(path = %expenses_file.display(), "created expenses file");
        } else {
            tracing::debug!(path = %expenses_file.display(), "expenses file already exists");
        }

        Ok(Self {
            expenses: ExpenseRepository::new(expenses_file),
        })
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<LoadReport, ExpenseError> {
        self.expenses.load()
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), ExpenseError> {
        self.expenses.save()
    }

    /// Create storage and load it in one step
    pub fn open(paths: TrackerPaths) -> Result<(Self, LoadReport), ExpenseError> {
        let mut storage = Self::new(paths)?;
        let report = storage.load_all()?;
        Ok((storage, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("csv_data");
        let paths = TrackerPaths::with_base_dir(base.clone());
        let storage = Storage::new(paths).unwrap();

        assert!(base.is_dir());
        assert!(base.join("expenses.csv").exists());
        assert!(!storage.expenses.is_ready());
        assert!(matches!(storage.save_all(), Err(ExpenseError::NotReady)));
    }

    #[test]
    fn test_open_loads_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("expenses.csv"),
            "2,Bus,2.00,2024-05-02,Transport\n",
        )
        .unwrap();

        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let (storage, report) = Storage::open(paths).unwrap();

        assert_eq!(report.loaded, 1);
        assert!(!report.file_missing);
        assert!(storage.expenses.is_ready());
        assert_eq!(storage.expenses.count().unwrap(), 1);
    }
}
