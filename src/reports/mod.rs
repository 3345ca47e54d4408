//! Reports module for backoffice-cli
//!
//! Provides the payment reconciliation report that merges the three business
//! domains per day and payment method, the payment-mode breakdown derived
//! from it, and the inclusion rules both depend on.

pub mod breakdown;
pub mod reconciliation;
pub mod rules;

pub use breakdown::{MethodBreakdown, MethodShare};
pub use reconciliation::{
    MethodAmounts, PendingLedger, ReconciliationReport, ReportOptions, ReportRow, RowKind,
};
pub use rules::InclusionRules;
