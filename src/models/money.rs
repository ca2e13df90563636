//! Money type for representing currency amounts
//!
//! Internally stores amounts in cents (i64) to avoid floating-point precision
//! issues. Arithmetic is checked; a total that does not fit is an error rather
//! than a wrapped value.

use std::fmt;

/// Represents a monetary amount stored as cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use expense_tracker::models::Money;
    /// let amount = Money::from_cents(350); // $3.50
    /// assert_eq!(amount.to_plain_string(), "3.50");
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the whole dollars portion (truncated toward zero)
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Check if the amount is positive
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Check if the amount is negative
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Add two amounts, failing if the result does not fit
    pub fn checked_add(self, other: Self) -> Result<Self, AmountOverflow> {
        self.0.checked_add(other.0).map(Self).ok_or(AmountOverflow)
    }

    /// Parse a money amount typed by the user
    ///
    /// Accepts formats: "3.50", "3.5", "3", "$3.50", "-3.50". At most two
    /// decimal places are allowed; anything finer is rejected rather than
    /// rounded.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let original = s.trim();
        let parts = split_number(original)?;

        if parts.exponent.is_some() {
            return Err(MoneyParseError::InvalidFormat(original.to_string()));
        }
        if parts.fraction.len() > 2 {
            return Err(MoneyParseError::TooPrecise(original.to_string()));
        }

        let (amount, _) = parts.to_cents(original)?;
        Ok(amount)
    }

    /// Parse a stored amount, rounding to cents half away from zero
    ///
    /// Besides everything [`Money::parse`] takes, this accepts any number of
    /// decimals and exponent notation (`1.2345678E7`), which older data files
    /// contain. The flag is `true` when the value had to be rounded.
    pub fn parse_rounded(s: &str) -> Result<(Self, bool), MoneyParseError> {
        let original = s.trim();
        split_number(original)?.to_cents(original)
    }

    /// Format without a currency symbol, always with two decimals ("3.50")
    pub fn to_plain_string(&self) -> String {
        if self.is_negative() {
            format!("-{}.{:02}", self.dollars().abs(), self.cents_part())
        } else {
            format!("{}.{:02}", self.dollars(), self.cents_part())
        }
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!(
                "-{}{}.{:02}",
                symbol,
                self.dollars().abs(),
                self.cents_part()
            )
        } else {
            format!("{}{}.{:02}", symbol, self.dollars(), self.cents_part())
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_symbol("$"))
    }
}

/// A decimal number split into its textual parts
struct NumberParts<'a> {
    negative: bool,
    whole: &'a str,
    fraction: &'a str,
    exponent: Option<i64>,
}

fn split_number(original: &str) -> Result<NumberParts<'_>, MoneyParseError> {
    let invalid = || MoneyParseError::InvalidFormat(original.to_string());

    let (negative, s) = match original.strip_prefix('-') {
        Some(stripped) => (true, stripped),
        None => (false, original),
    };
    let s = s.strip_prefix('$').unwrap_or(s);

    let (mantissa, exponent) = match s.find(|c| c == 'e' || c == 'E') {
        Some(at) => {
            let digits = &s[at + 1..];
            let unsigned = digits
                .strip_prefix('-')
                .or_else(|| digits.strip_prefix('+'))
                .unwrap_or(digits);
            if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            let exponent: i64 = digits
                .parse()
                .map_err(|_| MoneyParseError::OutOfRange(original.to_string()))?;
            (&s[..at], Some(exponent))
        }
        None => (s, None),
    };

    let (whole, fraction) = match mantissa.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (mantissa, ""),
    };

    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    Ok(NumberParts {
        negative,
        whole,
        fraction,
        exponent,
    })
}

impl NumberParts<'_> {
    /// Convert to cents, rounding half away from zero
    fn to_cents(&self, original: &str) -> Result<(Money, bool), MoneyParseError> {
        let out_of_range = || MoneyParseError::OutOfRange(original.to_string());

        let digits = format!("{}{}", self.whole, self.fraction);
        let digits = digits.trim_start_matches('0');

        // Power of ten that turns the digit string into cents
        let scale = self
            .exponent
            .unwrap_or(0)
            .checked_sub(self.fraction.len() as i64)
            .and_then(|s| s.checked_add(2))
            .ok_or_else(out_of_range)?;

        let (cents, rounded) = if digits.is_empty() {
            (0, false)
        } else if scale >= 0 {
            // i64 holds at most 19 digits
            if digits.len() as i64 + scale > 19 {
                return Err(out_of_range());
            }
            let cents: i64 = digits.parse().map_err(|_| out_of_range())?;
            let cents = cents
                .checked_mul(10_i64.pow(scale as u32))
                .ok_or_else(out_of_range)?;
            (cents, false)
        } else {
            let dropped = usize::try_from(-scale).unwrap_or(usize::MAX);
            let (kept, removed) = digits.split_at(digits.len().saturating_sub(dropped));

            // Past the leading digit the rounding digit is an implied zero
            let round_digit = if dropped > digits.len() {
                b'0'
            } else {
                removed.bytes().next().unwrap_or(b'0')
            };

            let kept: i64 = if kept.is_empty() {
                0
            } else {
                kept.parse().map_err(|_| out_of_range())?
            };
            let cents = if round_digit >= b'5' {
                kept.checked_add(1).ok_or_else(out_of_range)?
            } else {
                kept
            };
            (cents, removed.bytes().any(|b| b != b'0'))
        };

        let cents = if self.negative { -cents } else { cents };
        Ok((Money(cents), rounded))
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    TooPrecise(String),
    OutOfRange(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat(s) => write!(f, "Invalid money format: '{}'", s),
            Self::TooPrecise(s) => {
                write!(f, "Amount '{}' has more than two decimal places", s)
            }
            Self::OutOfRange(s) => write!(f, "Amount '{}' is too large", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

/// A sum of amounts that does not fit in the cents range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountOverflow;

impl fmt::Display for AmountOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Total amount is too large to compute")
    }
}

impl std::error::Error for AmountOverflow {}
