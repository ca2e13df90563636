//! Summary service
//!
//! Read-only aggregates over the recorded expenses: overall totals, monthly
//! totals, and category filters.

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{CategoryReport, MonthlySummary, Summary};
use crate::storage::Storage;

/// Service for expense summaries
pub struct SummaryService<'a> {
    storage: &'a Storage,
}

impl<'a> SummaryService<'a> {
    /// Create a new summary service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Count and total of every expense, or `None` when nothing is recorded
    pub fn summary(&self) -> ExpenseResult<Option<Summary>> {
        let summary = Summary::of(self.storage.expenses.get_all()?)?;
        Ok((!summary.is_empty()).then_some(summary))
    }

    /// Count and total of the expenses dated within one calendar month
    pub fn summary_for_month(&self, year: i32, month: u32) -> ExpenseResult<MonthlySummary> {
        if !(1..=12).contains(&month) {
            return Err(ExpenseError::InvalidMonth(month));
        }

        let expenses = self.storage.expenses.get_all()?;
        let summary = Summary::of(expenses.iter().filter(|e| e.in_month(year, month)))?;

        Ok(MonthlySummary {
            year,
            month,
            summary,
        })
    }

    /// Expenses whose category matches exactly, ignoring case
    ///
    /// A blank query matches nothing, since every category is non-empty.
    pub fn filter_by_category(&self, category: &str) -> ExpenseResult<CategoryReport> {
        let category = category.trim();

        let expenses: Vec<_> = self
            .storage
            .expenses
            .get_all()?
            .iter()
            .filter(|e| e.in_category(category))
            .cloned()
            .collect();
        let summary = Summary::of(&expenses)?;

        Ok(CategoryReport {
            category: category.to_string(),
            expenses,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TrackerPaths;
    use crate::models::{ExpenseId, Money};
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_storage(contents: &str) -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("expenses.csv"), contents).unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let (storage, _) = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    const SAMPLE: &str = "1,Coffee,3.50,2024-05-01,Food\n\
                          2,Bus,2.00,2024-05-02,Transport\n\
                          3,Groceries,45.10,2024-06-10,food\n\
                          4,Rent,900.00,2023-05-01,Housing\n";

    #[test]
    fn test_summary_empty() {
        let (_temp_dir, storage) = create_test_storage("");
        let service = SummaryService::new(&storage);

        assert_eq!(service.summary().unwrap(), None);
    }

    #[test]
    fn test_summary_totals() {
        let (_temp_dir, storage) = create_test_storage(SAMPLE);
        let service = SummaryService::new(&storage);

        let summary = service.summary().unwrap().unwrap();
        assert_eq!(summary.count, 4);
        assert_eq!(summary.total, Money::from_cents(95060));
    }

    #[test]
    fn test_summary_for_month() {
        let (_temp_dir, storage) = create_test_storage(SAMPLE);
        let service = SummaryService::new(&storage);

        let may = service.summary_for_month(2024, 5).unwrap();
        assert_eq!(may.summary.count, 2);
        assert_eq!(may.summary.total, Money::from_cents(550));

        // Same month in another year is excluded
        let may_2023 = service.summary_for_month(2023, 5).unwrap();
        assert_eq!(may_2023.summary.count, 1);

        let empty = service.summary_for_month(2024, 12).unwrap();
        assert!(empty.summary.is_empty());
        assert_eq!(empty.summary.total, Money::zero());
    }

    #[test]
    fn test_summary_for_invalid_month() {
        let (_temp_dir, storage) = create_test_storage(SAMPLE);
        let service = SummaryService::new(&storage);

        assert!(matches!(
            service.summary_for_month(2024, 0),
            Err(ExpenseError::InvalidMonth(0))
        ));
        assert!(matches!(
            service.summary_for_month(2024, 13),
            Err(ExpenseError::InvalidMonth(13))
        ));
    }

    #[test]
    fn test_filter_by_category_ignores_case() {
        let (_temp_dir, storage) = create_test_storage(SAMPLE);
        let service = SummaryService::new(&storage);

        let report = service.filter_by_category("FOOD").unwrap();
        let ids: Vec<_> = report.expenses.iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec![ExpenseId::new(1), ExpenseId::new(3)]);
        assert_eq!(report.summary.total, Money::from_cents(4860));

        let none = service.filter_by_category("Travel").unwrap();
        assert!(none.expenses.is_empty());
        assert!(none.summary.is_empty());

        // No partial matches
        assert!(service.filter_by_category("Foo").unwrap().expenses.is_empty());

        // A blank query is an empty match, not an error
        let blank = service.filter_by_category("  ").unwrap();
        assert!(blank.expenses.is_empty());
        assert!(blank.summary.is_empty());
    }

    #[test]
    fn test_dates_used_for_month_filter() {
        let (_temp_dir, storage) = create_test_storage(SAMPLE);
        let service = SummaryService::new(&storage);
        let june = service.summary_for_month(2024, 6).unwrap();

        assert_eq!(june.summary.count, 1);
        assert_eq!(
            storage.expenses.get_all().unwrap()[2].date(),
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
        );
    }

    #[test]
    fn test_summary_overflow_is_reported() {
        let (_temp_dir, storage) = create_test_storage(
            "1,Yacht,50000000000000000,2024-05-01,Toys\n\
             2,Island,50000000000000000,2024-05-02,Toys\n",
        );
        let service = SummaryService::new(&storage);

        assert!(service.summary().unwrap_err().is_validation());
        assert!(service.summary_for_month(2024, 5).unwrap_err().is_validation());
        assert!(service.filter_by_category("toys").unwrap_err().is_validation());
    }
}
