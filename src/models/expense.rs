//! Expense model
//!
//! A single recorded expense and its conversion to and from one line of the
//! persisted file (`id,name,amount,date,category`).

use chrono::NaiveDate;
use std::fmt;

use super::ids::{ExpenseId, IdSequence};
use super::money::{Money, MoneyParseError};

/// Separator between fields of a persisted line
pub const FIELD_DELIMITER: char = ',';

/// Number of fields in a persisted line
pub const FIELD_COUNT: usize = 5;

/// Date format of the persisted file and of user input (ISO 8601)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an ISO 8601 calendar date (`YYYY-MM-DD`)
pub fn parse_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
}

/// A recorded expense
///
/// Fields are private so the id can never change after construction and every
/// mutation goes through validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expense {
    id: ExpenseId,
    name: String,
    amount: Money,
    date: NaiveDate,
    category: String,
}

impl Expense {
    /// Create a new expense, taking the next id from `ids`
    ///
    /// Validation happens before allocation, so a rejected expense does not
    /// consume an id. Fails with `IdsExhausted` once every id is taken.
    pub fn new(
        ids: &mut IdSequence,
        name: &str,
        amount: Money,
        date: NaiveDate,
        category: &str,
    ) -> Result<Self, ExpenseValidationError> {
        let name = validate_text(name, TextField::Name)?;
        let category = validate_text(category, TextField::Category)?;
        validate_amount(amount)?;
        let id = ids
            .allocate()
            .ok_or(ExpenseValidationError::IdsExhausted)?;

        Ok(Self {
            id,
            name,
            amount,
            date,
            category,
        })
    }

    /// Restore an expense with a known id (e.g. loaded from disk)
    ///
    /// Advances `ids` past `id` so later allocations never collide with it.
    pub fn restore(
        ids: &mut IdSequence,
        id: ExpenseId,
        name: &str,
        amount: Money,
        date: NaiveDate,
        category: &str,
    ) -> Result<Self, ExpenseValidationError> {
        let name = validate_text(name, TextField::Name)?;
        let category = validate_text(category, TextField::Category)?;
        validate_amount(amount)?;

        ids.observe(id);

        Ok(Self {
            id,
            name,
            amount,
            date,
            category,
        })
    }

    /// Parse an expense from already-split fields
    ///
    /// The first five fields are used; extra trailing fields are ignored.
    /// Stored amounts may carry more than two decimals or an exponent (as
    /// written by other tools); they are rounded half away from zero to whole
    /// cents with a warning.
    pub fn from_fields(ids: &mut IdSequence, fields: &[&str]) -> Result<Self, LineError> {
        if fields.len() < FIELD_COUNT {
            return Err(LineError::TooFewFields {
                found: fields.len(),
            });
        }

        let id_field = fields[0].trim();
        let id = ExpenseId::parse(id_field)
            .map_err(|_| LineError::InvalidId(id_field.to_string()))?;
        let amount_field = fields[2].trim();
        let (amount, rounded) =
            Money::parse_rounded(amount_field).map_err(LineError::InvalidAmount)?;
        if rounded {
            tracing::warn!(
                id = %id,
                stored = amount_field,
                amount = %amount,
                "stored amount rounded to whole cents"
            );
        }
        let date_field = fields[3].trim();
        let date =
            parse_date(date_field).map_err(|_| LineError::InvalidDate(date_field.to_string()))?;

        Self::restore(ids, id, fields[1], amount, date, fields[4]).map_err(LineError::Invalid)
    }

    /// Parse an expense from one persisted line
    pub fn from_line(ids: &mut IdSequence, line: &str) -> Result<Self, LineError> {
        let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
        Self::from_fields(ids, &fields)
    }

    /// The persisted fields, in file order
    pub fn fields(&self) -> [String; FIELD_COUNT] {
        [
            self.id.to_string(),
            self.name.clone(),
            self.amount.to_plain_string(),
            self.date.format(DATE_FORMAT).to_string(),
            self.category.clone(),
        ]
    }

    /// Serialize to one persisted line (no trailing newline)
    pub fn to_line(&self) -> String {
        self.fields().join(FIELD_DELIMITER.to_string().as_str())
    }

    pub fn id(&self) -> ExpenseId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), ExpenseValidationError> {
        self.name = validate_text(name, TextField::Name)?;
        Ok(())
    }

    pub fn set_amount(&mut self, amount: Money) -> Result<(), ExpenseValidationError> {
        validate_amount(amount)?;
        self.amount = amount;
        Ok(())
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
    }

    pub fn set_category(&mut self, category: &str) -> Result<(), ExpenseValidationError> {
        self.category = validate_text(category, TextField::Category)?;
        Ok(())
    }

    /// Case-insensitive exact match on the category
    pub fn in_category(&self, category: &str) -> bool {
        self.category.to_lowercase() == category.trim().to_lowercase()
    }

    /// Whether the expense falls within the given calendar month
    pub fn in_month(&self, year: i32, month: u32) -> bool {
        use chrono::Datelike;
        self.date.year() == year && self.date.month() == month
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Expense ID: {}, Description: {}, Amount: {}, Time: {}, Category: {}",
            self.id,
            self.name,
            self.amount,
            self.date.format(DATE_FORMAT),
            self.category
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextField {
    Name,
    Category,
}

impl TextField {
    fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Category => "category",
        }
    }
}

/// Check a description, returning it trimmed
pub fn validate_name(name: &str) -> Result<String, ExpenseValidationError> {
    validate_text(name, TextField::Name)
}

/// Check a category, returning it trimmed
pub fn validate_category(category: &str) -> Result<String, ExpenseValidationError> {
    validate_text(category, TextField::Category)
}

fn validate_text(value: &str, field: TextField) -> Result<String, ExpenseValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(match field {
            TextField::Name => ExpenseValidationError::EmptyName,
            TextField::Category => ExpenseValidationError::EmptyCategory,
        });
    }
    if value.contains(|c| c == FIELD_DELIMITER || c == '\n' || c == '\r') {
        return Err(ExpenseValidationError::UnsupportedCharacter {
            field: field.label(),
        });
    }
    Ok(value.to_string())
}

fn validate_amount(amount: Money) -> Result<(), ExpenseValidationError> {
    if !amount.is_positive() {
        return Err(ExpenseValidationError::NonPositiveAmount(amount));
    }
    Ok(())
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    EmptyName,
    EmptyCategory,
    NonPositiveAmount(Money),
    UnsupportedCharacter { field: &'static str },
    IdsExhausted,
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Description cannot be empty"),
            Self::EmptyCategory => write!(f, "Category cannot be empty"),
            Self::NonPositiveAmount(amount) => {
                write!(f, "Amount must be greater than zero (got {})", amount)
            }
            Self::UnsupportedCharacter { field } => write!(
                f,
                "The {} cannot contain '{}' or line breaks",
                field, FIELD_DELIMITER
            ),
            Self::IdsExhausted => write!(f, "No expense ids are left to assign"),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

/// Why a persisted line could not be turned into an expense
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    TooFewFields { found: usize },
    InvalidId(String),
    InvalidAmount(MoneyParseError),
    InvalidDate(String),
    Invalid(ExpenseValidationError),
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewFields { found } => write!(
                f,
                "expected {} fields, found {}",
                FIELD_COUNT, found
            ),
            Self::InvalidId(id) => write!(f, "invalid id '{}'", id),
            Self::InvalidAmount(e) => write!(f, "{}", e),
            Self::InvalidDate(date) => write!(f, "invalid date '{}'", date),
            Self::Invalid(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for LineError {}
