//! backoffice-cli - Payment reconciliation for a guest house, restaurant and office
//!
//! This library merges the money movements of three business areas into one
//! per-day, per-payment-method reconciliation, fetched by date range from the
//! back-office REST API or from a saved snapshot.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Paths, user settings and logging setup
//! - `error`: Custom error types
//! - `models`: Dates, money, payment methods and transaction records
//! - `fetch`: Date-range fetching with stale-result protection
//! - `storage`: JSON file helpers and the offline snapshot source
//! - `reports`: The reconciliation aggregator and payment-mode breakdown
//! - `display`: Terminal grids
//! - `export`: XLSX and CSV export
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use backoffice_cli::fetch::{ApiClient, ReconciliationLoader};
//! use backoffice_cli::models::{DateRange, ReportKind};
//! use backoffice_cli::reports::{ReconciliationReport, ReportOptions};
//!
//! let loader = ReconciliationLoader::new(ApiClient::new(&settings.api)?);
//! let range = DateRange::parse("01-03-2024", "31-03-2024")?;
//! if let Some(period) = loader.load(ReportKind::Merged, range).await.into_current() {
//!     let report = ReconciliationReport::from_period(&period, &ReportOptions::default());
//! }
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod fetch;
pub mod models;
pub mod reports;
pub mod storage;

pub use error::BackofficeError;
