//! Expense repository for the flat expenses file
//!
//! Owns the in-memory, insertion-ordered collection of expenses and the id
//! sequence, and synchronizes both with the persisted file.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::expense::FIELD_DELIMITER;
use crate::models::{Expense, ExpenseId, IdSequence, LineError, Money};

use super::file_io::{read_delimited, write_delimited_atomic, RawLine};

/// Lifecycle of a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// Created but not loaded; every data operation fails with `NotReady`
    Uninitialized,
    /// Loaded from disk (or found empty); all operations available
    Ready,
}

/// How a caller refers to an existing expense
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseSelector {
    /// 1-based position in the listing order
    Position(usize),
    /// Explicit expense id
    Id(ExpenseId),
}

impl fmt::Display for ExpenseSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(position) => write!(f, "{}", position),
            Self::Id(id) => write!(f, "#{}", id),
        }
    }
}

impl FromStr for ExpenseSelector {
    type Err = ExpenseError;

    /// `3` is a position; `#3` or `id:3` is an id
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || {
            ExpenseError::Validation(format!(
                "'{}' is not a position (e.g. 2) or an id (e.g. #7 or id:7)",
                s
            ))
        };

        if let Some(id) = s.strip_prefix('#').or_else(|| s.strip_prefix("id:")) {
            return ExpenseId::parse(id).map(Self::Id).map_err(|_| invalid());
        }

        s.parse::<usize>().map(Self::Position).map_err(|_| invalid())
    }
}

/// A persisted line that was not loaded, and why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub line_number: u64,
    pub content: String,
    pub reason: SkipReason,
}

/// Reason a persisted line was skipped during load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The line is not valid UTF-8
    Encoding,
    /// The line's fields could not be turned into an expense
    Malformed(LineError),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encoding => write!(f, "line is not valid UTF-8"),
            Self::Malformed(e) => write!(f, "{}", e),
        }
    }
}

/// Outcome of loading the expenses file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Number of expenses loaded
    pub loaded: usize,
    /// Lines that were skipped with a warning
    pub skipped: Vec<SkippedLine>,
    /// The file did not exist; started with zero expenses
    pub file_missing: bool,
}

/// Repository for expense persistence
pub struct ExpenseRepository {
    path: PathBuf,
    expenses: Vec<Expense>,
    ids: IdSequence,
    state: StoreState,
}

impl ExpenseRepository {
    /// Create a new, not yet loaded, expense repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            expenses: Vec::new(),
            ids: IdSequence::new(),
            state: StoreState::Uninitialized,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state == StoreState::Ready
    }

    fn ensure_ready(&self) -> ExpenseResult<()> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(ExpenseError::NotReady)
        }
    }

    /// Load expenses from disk, replacing the in-memory collection
    ///
    /// Lines that are short or have a malformed field are skipped and
    /// reported. A missing file means zero expenses. A read failure aborts
    /// the load and leaves the repository unchanged.
    pub fn load(&mut self) -> ExpenseResult<LoadReport> {
        let mut report = LoadReport::default();

        let lines = match read_delimited(&self.path, FIELD_DELIMITER)? {
            Some(lines) => lines,
            None => {
                tracing::warn!(
                    path = %self.path.display(),
                    "expenses file not found; starting with no expenses"
                );
                report.file_missing = true;
                Vec::new()
            }
        };

        // Never move the sequence backwards, even across reloads
        let mut ids = self.ids.clone();
        let mut expenses = Vec::with_capacity(lines.len());

        for RawLine {
            line_number,
            fields,
        } in lines
        {
            let fields = match fields {
                Ok(fields) => fields,
                Err(_) => {
                    tracing::warn!(line = line_number, "skipping line that is not valid UTF-8");
                    report.skipped.push(SkippedLine {
                        line_number,
                        content: String::new(),
                        reason: SkipReason::Encoding,
                    });
                    continue;
                }
            };

            let refs: Vec<&str> = fields.iter().map(String::as_str).collect();
            match Expense::from_fields(&mut ids, &refs) {
                Ok(expense) => expenses.push(expense),
                Err(reason) => {
                    // A skipped line's id stays reserved in case it is repaired by hand
                    if let Some(id) = refs.first().and_then(|f| ExpenseId::parse(f).ok()) {
                        ids.observe(id);
                    }

                    let content = refs.join(FIELD_DELIMITER.to_string().as_str());
                    tracing::warn!(
                        line = line_number,
                        content = %content,
                        reason = %reason,
                        "skipping invalid line"
                    );
                    report.skipped.push(SkippedLine {
                        line_number,
                        content,
                        reason: SkipReason::Malformed(reason),
                    });
                }
            }
        }

        report.loaded = expenses.len();
        self.expenses = expenses;
        self.ids = ids;
        self.state = StoreState::Ready;

        tracing::info!(
            loaded = report.loaded,
            skipped = report.skipped.len(),
            "expenses loaded"
        );

        Ok(report)
    }

    /// Save every expense to disk in listing order, replacing the file contents
    pub fn save(&self) -> ExpenseResult<()> {
        // Saving an unloaded repository would wipe the file
        self.ensure_ready()?;

        write_delimited_atomic(
            &self.path,
            FIELD_DELIMITER,
            self.expenses.iter().map(Expense::fields),
        )
        .map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "failed to save expenses");
            e
        })?;

        tracing::debug!(count = self.expenses.len(), "expenses saved");
        Ok(())
    }

    /// All expenses in listing order
    pub fn get_all(&self) -> ExpenseResult<&[Expense]> {
        self.ensure_ready()?;
        Ok(&self.expenses)
    }

    /// Resolve a selector to an index into the collection
    pub fn index_of(&self, selector: ExpenseSelector) -> ExpenseResult<usize> {
        self.ensure_ready()?;

        match selector {
            ExpenseSelector::Position(position) => {
                if position >= 1 && position <= self.expenses.len() {
                    Ok(position - 1)
                } else {
                    Err(ExpenseError::position_not_found(
                        position,
                        self.expenses.len(),
                    ))
                }
            }
            ExpenseSelector::Id(id) => self
                .expenses
                .iter()
                .position(|e| e.id() == id)
                .ok_or_else(|| ExpenseError::id_not_found(id)),
        }
    }

    /// Get an expense by selector
    pub fn get(&self, selector: ExpenseSelector) -> ExpenseResult<&Expense> {
        let index = self.index_of(selector)?;
        Ok(&self.expenses[index])
    }

    /// Create an expense with the next id and append it
    pub fn create(
        &mut self,
        name: &str,
        amount: Money,
        date: chrono::NaiveDate,
        category: &str,
    ) -> ExpenseResult<&Expense> {
        self.ensure_ready()?;

        let expense = Expense::new(&mut self.ids, name, amount, date, category)
            .map_err(|e| ExpenseError::Validation(e.to_string()))?;
        self.expenses.push(expense);

        let last = self.expenses.len() - 1;
        Ok(&self.expenses[last])
    }

    /// Replace the expense at `index` with an edited copy of itself
    pub fn replace(&mut self, index: usize, expense: Expense) -> ExpenseResult<()> {
        self.ensure_ready()?;

        let len = self.expenses.len();
        let slot = self
            .expenses
            .get_mut(index)
            .ok_or_else(|| ExpenseError::position_not_found(index + 1, len))?;
        if slot.id() != expense.id() {
            return Err(ExpenseError::Validation(format!(
                "expense id cannot change ({} -> {})",
                slot.id(),
                expense.id()
            )));
        }

        *slot = expense;
        Ok(())
    }

    /// Remove an expense by selector
    pub fn remove(&mut self, selector: ExpenseSelector) -> ExpenseResult<Expense> {
        let index = self.index_of(selector)?;
        Ok(self.expenses.remove(index))
    }

    /// Count expenses
    pub fn count(&self) -> ExpenseResult<usize> {
        self.ensure_ready()?;
        Ok(self.expenses.len())
    }
}
