//! Calendar dates and date ranges
//!
//! The backend and the staff who type into it are not consistent about date
//! formats. `CalendarDate` accepts the three layouts seen in practice and
//! always displays as `DD-MM-YYYY`, the format the backend routes expect.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{BackofficeError, BackofficeResult};

/// Display and wire format
pub const DISPLAY_FORMAT: &str = "%d-%m-%Y";

/// Accepted input layouts, tried in order. Day-first wins over month-first.
const INPUT_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d-%m-%Y", "%m-%d-%Y"];

/// A single calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Build from year, month and day
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Today's date in local time
    pub fn today() -> Self {
        Self(chrono::Local::now().date_naive())
    }

    /// Parse any supported layout
    ///
    /// Accepts `DD-MM-YYYY`, `YYYY-MM-DD`, `MM-DD-YYYY`, `/` separators and
    /// ISO date-times (only the date part is kept).
    pub fn parse(s: &str) -> Result<Self, DateParseError> {
        let trimmed = s.trim();
        let date_part = trimmed
            .split(['T', ' '])
            .next()
            .unwrap_or(trimmed)
            .replace('/', "-");

        // chrono's %Y happily takes "24" as year 24
        if !has_four_digit_year(&date_part) {
            return Err(DateParseError(s.to_string()));
        }

        INPUT_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(&date_part, fmt).ok())
            .map(Self)
            .ok_or_else(|| DateParseError(s.to_string()))
    }

    /// Format as `DD-MM-YYYY`
    pub fn to_display(&self) -> String {
        self.0.format(DISPLAY_FORMAT).to_string()
    }
}

fn has_four_digit_year(s: &str) -> bool {
    s.split('-')
        .any(|part| part.len() == 4 && part.chars().all(|c| c.is_ascii_digit()))
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display())
    }
}

impl FromStr for CalendarDate {
    type Err = DateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_display())
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Error type for date parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParseError(pub String);

impl fmt::Display for DateParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid date '{}'. Use DD-MM-YYYY, YYYY-MM-DD or MM-DD-YYYY",
            self.0
        )
    }
}

impl std::error::Error for DateParseError {}

/// A closed range of calendar days, `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: CalendarDate,
    end: CalendarDate,
}

impl DateRange {
    /// Create a range, rejecting an end before the start
    pub fn new(start: CalendarDate, end: CalendarDate) -> BackofficeResult<Self> {
        if start > end {
            return Err(BackofficeError::Validation(format!(
                "Start date {} is after end date {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// A range covering a single day
    pub fn single(day: CalendarDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// Parse both ends from user text
    pub fn parse(start: &str, end: &str) -> BackofficeResult<Self> {
        let start = CalendarDate::parse(start)
            .map_err(|e| BackofficeError::Validation(e.to_string()))?;
        let end =
            CalendarDate::parse(end).map_err(|e| BackofficeError::Validation(e.to_string()))?;
        Self::new(start, end)
    }

    pub fn start(&self) -> CalendarDate {
        self.start
    }

    pub fn end(&self) -> CalendarDate {
        self.end
    }

    pub fn contains(&self, date: CalendarDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Label used in titles and file names, e.g. `01-03-2024_to_31-03-2024`
    pub fn label(&self) -> String {
        format!("{}_to_{}", self.start, self.end)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}
