//! Expense identifiers and the sequence that hands them out
//!
//! Ids are small positive integers. They are assigned monotonically by an
//! [`IdSequence`] owned by the expense repository, so an id is never reused
//! within a store's lifetime, including after records are restored from disk.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Identifier of a single expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExpenseId(u32);

impl ExpenseId {
    /// Create an id from its raw value
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Parse an id from a string, accepting an optional `#` prefix
    pub fn parse(s: &str) -> Result<Self, ParseIntError> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        Ok(Self(s.parse()?))
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ExpenseId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Monotonic source of expense ids
///
/// `next` only ever grows: allocating advances it, and observing a restored
/// id at or above it moves it past that id. It is one wider than an id so
/// that observing `u32::MAX` leaves the sequence exhausted instead of
/// wrapping or handing the same id out twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    /// Create a sequence whose first id is 1
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// Allocate the next id, or `None` once every id has been used
    pub fn allocate(&mut self) -> Option<ExpenseId> {
        let id = u32::try_from(self.next).ok()?;
        self.next += 1;
        Some(ExpenseId(id))
    }

    /// Record an id assigned elsewhere (e.g. loaded from disk)
    pub fn observe(&mut self, id: ExpenseId) {
        let id = u64::from(id.0);
        if id >= self.next {
            self.next = id + 1;
        }
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}
