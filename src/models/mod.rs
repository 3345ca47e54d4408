//! Core data models for backoffice-cli
//!
//! This module contains the data structures that describe the back office:
//! money, calendar dates, payment methods, fetched transaction records,
//! opening balances and report kinds.

pub mod date;
pub mod money;
pub mod opening;
pub mod payment;
pub mod record;
pub mod report_kind;

pub use date::{CalendarDate, DateParseError, DateRange};
pub use money::{Money, MoneyParseError};
pub use opening::OpeningBalances;
pub use payment::{Direction, Domain, PaymentMethod};
pub use record::{RawRecord, RecordError, TransactionRecord};
pub use report_kind::ReportKind;
