//! Aggregates over sets of expenses

use super::expense::Expense;
use super::money::{AmountOverflow, Money};

/// Count and total amount over a set of expenses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub count: usize,
    pub total: Money,
}

impl Summary {
    /// Summarize the given expenses
    ///
    /// Fails instead of wrapping when the total does not fit.
    pub fn of<'a, I>(expenses: I) -> Result<Self, AmountOverflow>
    where
        I: IntoIterator<Item = &'a Expense>,
    {
        expenses
            .into_iter()
            .try_fold(Self::default(), |acc, expense| -> Result<Self, AmountOverflow> {
                Ok(Self {
                    count: acc.count + 1,
                    total: acc.total.checked_add(expense.amount())?,
                })
            })
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Expenses matching a category filter, with their summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryReport {
    /// The category as it was queried
    pub category: String,
    pub expenses: Vec<Expense>,
    pub summary: Summary,
}

/// Summary for one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub summary: Summary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IdSequence;
    use chrono::NaiveDate;

    #[test]
    fn test_summary_of_expenses() {
        let mut ids = IdSequence::new();
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let expenses = vec![
            Expense::new(&mut ids, "Coffee", Money::from_cents(350), date, "Food").unwrap(),
            Expense::new(&mut ids, "Bus", Money::from_cents(200), date, "Transport").unwrap(),
        ];

        let summary = Summary::of(&expenses).unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total, Money::from_cents(550));
    }

    #[test]
    fn test_empty_summary() {
        let summary = Summary::of(&Vec::<Expense>::new()).unwrap();
        assert!(summary.is_empty());
        assert_eq!(summary.total, Money::zero());
    }

    #[test]
    fn test_total_overflow_is_an_error() {
        let mut ids = IdSequence::new();
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let huge = Money::parse("50000000000000000").unwrap();
        let expenses = vec![
            Expense::new(&mut ids, "Yacht", huge, date, "Toys").unwrap(),
            Expense::new(&mut ids, "Island", huge, date, "Toys").unwrap(),
        ];

        assert_eq!(Summary::of(&expenses), Err(AmountOverflow));
    }
}
