//! Display formatting for terminal output
//!
//! Renders reports as grids and proportional breakdowns.

pub mod report;

pub use report::{format_breakdown, format_reconciliation};
