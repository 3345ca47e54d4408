//! Transaction records as fetched from the backend
//!
//! The backend returns loosely shaped JSON per domain. `RawRecord` accepts
//! what it sends; `TransactionRecord::from_raw` turns it into a typed record
//! or explains why the row can't be used.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::date::CalendarDate;
use super::money::Money;
use super::payment::{Direction, Domain, PaymentMethod};

/// A record exactly as the backend serialises it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    #[serde(default)]
    pub date: String,

    /// Number or numeric string
    #[serde(default)]
    pub amount: Value,

    #[serde(default, alias = "payment_method", alias = "paymentMode", alias = "mode")]
    pub payment_method: String,

    #[serde(default, alias = "type")]
    pub direction: Option<String>,

    #[serde(default, alias = "is_settled", alias = "paid", alias = "settled")]
    pub is_settled: Option<bool>,

    #[serde(default)]
    pub category: Option<String>,
}

/// A typed transaction from one domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub domain: Domain,
    pub date: CalendarDate,
    pub amount: Money,
    pub payment_method: PaymentMethod,
    pub direction: Direction,
    pub is_settled: bool,
    pub category: String,
}

impl TransactionRecord {
    /// Build an inflow record; mostly useful for tests and fixtures
    pub fn inflow(
        domain: Domain,
        date: CalendarDate,
        method: PaymentMethod,
        amount: Money,
    ) -> Self {
        Self {
            domain,
            date,
            amount,
            payment_method: method,
            direction: Direction::In,
            is_settled: true,
            category: String::new(),
        }
    }

    /// Build an outflow record
    pub fn outflow(
        domain: Domain,
        date: CalendarDate,
        method: PaymentMethod,
        amount: Money,
    ) -> Self {
        Self {
            direction: Direction::Out,
            ..Self::inflow(domain, date, method, amount)
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_settled(mut self, settled: bool) -> Self {
        self.is_settled = settled;
        self
    }

    /// Convert a wire record
    ///
    /// Dates and payment methods must be recognisable. Amounts that are not
    /// numeric are coerced to zero. Missing direction means inflow; missing
    /// settlement flag means settled.
    pub fn from_raw(domain: Domain, raw: RawRecord) -> Result<Self, RecordError> {
        let date =
            CalendarDate::parse(&raw.date).map_err(|_| RecordError::InvalidDate(raw.date.clone()))?;

        let payment_method = raw
            .payment_method
            .parse::<PaymentMethod>()
            .map_err(|_| RecordError::UnknownMethod(raw.payment_method.clone()))?;

        let direction = match raw.direction.as_deref() {
            None | Some("") => Direction::In,
            Some(d) => d
                .parse::<Direction>()
                .map_err(|_| RecordError::UnknownDirection(d.to_string()))?,
        };

        Ok(Self {
            domain,
            date,
            amount: coerce_amount(&raw.amount),
            payment_method,
            direction,
            is_settled: raw.is_settled.unwrap_or(true),
            category: raw.category.unwrap_or_default(),
        })
    }
}

impl From<&TransactionRecord> for RawRecord {
    fn from(record: &TransactionRecord) -> Self {
        let direction = match record.direction {
            Direction::In => "in",
            Direction::Out => "out",
        };
        Self {
            date: record.date.to_display(),
            amount: serde_json::Number::from_f64(record.amount.as_f64())
                .map(Value::Number)
                .unwrap_or(Value::Null),
            payment_method: record.payment_method.label().to_string(),
            direction: Some(direction.to_string()),
            is_settled: Some(record.is_settled),
            category: Some(record.category.clone()),
        }
    }
}

fn coerce_amount(value: &Value) -> Money {
    match value {
        Value::Number(n) => n.as_f64().map(Money::from_f64).unwrap_or_default(),
        Value::String(s) => Money::parse_or_zero(s),
        _ => Money::zero(),
    }
}

/// Why a wire record was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    InvalidDate(String),
    UnknownMethod(String),
    UnknownDirection(String),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::InvalidDate(d) => write!(f, "invalid date '{}'", d),
            RecordError::UnknownMethod(m) => write!(f, "unknown payment method '{}'", m),
            RecordError::UnknownDirection(d) => write!(f, "unknown direction '{}'", d),
        }
    }
}

impl std::error::Error for RecordError {}
