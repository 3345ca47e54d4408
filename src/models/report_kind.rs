//! Report kinds
//!
//! Each dashboard is one `ReportKind`. The kind decides which domains get
//! fetched and what prefix exported files carry.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::payment::Domain;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    /// Guest house, restaurant and office merged
    #[default]
    Merged,
    GuestHouse,
    Restaurant,
    Office,
}

impl ReportKind {
    /// Domains whose records feed this report
    pub fn domains(&self) -> &'static [Domain] {
        match self {
            ReportKind::Merged => &Domain::ALL,
            ReportKind::GuestHouse => &[Domain::GuestHouse],
            ReportKind::Restaurant => &[Domain::Restaurant],
            ReportKind::Office => &[Domain::Office],
        }
    }

    /// Prefix for exported file names
    pub fn file_prefix(&self) -> &'static str {
        match self {
            ReportKind::Merged => "office_merged",
            ReportKind::GuestHouse => "guest_house",
            ReportKind::Restaurant => "restaurant",
            ReportKind::Office => "office",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Merged => "Office Merged Reconciliation",
            ReportKind::GuestHouse => "Guest House Sales",
            ReportKind::Restaurant => "Restaurant Sales",
            ReportKind::Office => "Office Bank Book",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}
