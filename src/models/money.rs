//! Money type for representing currency amounts
//!
//! Internally stores amounts in minor units (i64) so that daily sums never
//! drift the way floating-point totals do. Provides safe arithmetic
//! operations, lenient parsing and formatting.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Currency symbols stripped when parsing user input
const KNOWN_SYMBOLS: [&str; 4] = ["₹", "$", "Rs.", "Rs"];

/// Represents a monetary amount stored in minor units (hundredths)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from minor units
    ///
    /// # Examples
    /// ```
    /// use backoffice_cli::models::Money;
    /// let amount = Money::from_minor(105050); // 1050.50
    /// ```
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Create a Money amount from whole units
    pub const fn from_units(units: i64) -> Self {
        Self(units * 100)
    }

    /// Create a Money amount from a float, rounded to the nearest minor unit
    ///
    /// Non-finite values become zero.
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() {
            Self((value * 100.0).round() as i64)
        } else {
            Self::zero()
        }
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in minor units
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Get the whole units portion (truncated toward zero)
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Get the minor portion (0-99)
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Amount as a float, for spreadsheet cells and percentages
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Divide, rounding half away from zero; dividing by zero gives zero
    pub fn div_rounded(&self, divisor: i64) -> Self {
        if divisor == 0 {
            return Self::zero();
        }
        let q = self.0 / divisor;
        let r = self.0 % divisor;
        if (r.abs() * 2) >= divisor.abs() {
            let sign = if (self.0 < 0) ^ (divisor < 0) { -1 } else { 1 };
            Self(q + sign)
        } else {
            Self(q)
        }
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "1050.50", "-20", "₹500", "₹-5.50", "1,050.5", "Rs 75".
    /// Amounts too large for minor units are rejected.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let original = s.trim();
        let invalid = || MoneyParseError::InvalidFormat(original.to_string());

        let (mut negative, s) = strip_sign(original);

        let s = KNOWN_SYMBOLS
            .iter()
            .find_map(|sym| s.strip_prefix(sym))
            .unwrap_or(s)
            .trim();

        // The sign may also follow the symbol
        let (sign_after_symbol, s) = strip_sign(s);
        if sign_after_symbol {
            if negative {
                return Err(invalid());
            }
            negative = true;
        }

        // Thousands separators
        let cleaned: String = s.chars().filter(|c| *c != ',').collect();
        let (whole, frac) = cleaned.split_once('.').unwrap_or((cleaned.as_str(), ""));

        let is_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty()) || !is_digits(whole) || !is_digits(frac) {
            return Err(invalid());
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };

        // Pad or truncate to 2 digits
        let frac: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => frac[..2].parse().map_err(|_| invalid())?,
        };

        let minor = whole
            .checked_mul(100)
            .and_then(|m| m.checked_add(frac))
            .ok_or_else(invalid)?;

        Ok(Self(if negative { -minor } else { minor }))
    }

    /// Parse user input, treating anything non-numeric as zero
    pub fn parse_or_zero(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!("-{}{}.{:02}", symbol, self.units().abs(), self.minor_part())
        } else {
            format!("{}{}.{:02}", symbol, self.units(), self.minor_part())
        }
    }
}

/// Split off a leading minus sign
fn strip_sign(s: &str) -> (bool, &str) {
    match s.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, s),
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-{}.{:02}", self.units().abs(), self.minor_part())
        } else {
            write!(f, "{}.{:02}", self.units(), self.minor_part())
        }
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}
