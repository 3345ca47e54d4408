//! Payment-mode breakdown
//!
//! Share of each payment method in the period total, the data behind the
//! dashboard's pie chart.

use super::reconciliation::ReconciliationReport;
use crate::models::{Money, PaymentMethod};

#[derive(Debug, Clone, PartialEq)]
pub struct MethodShare {
    pub method: PaymentMethod,
    pub amount: Money,
    /// Percent of the period total; can be negative or exceed 100 when
    /// some methods closed the period below zero
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodBreakdown {
    pub shares: Vec<MethodShare>,
    pub total: Money,
}

impl MethodBreakdown {
    /// Breakdown of the report's totals row (opening included once)
    pub fn from_report(report: &ReconciliationReport) -> Self {
        let net = report.totals.as_ref().map(|t| t.net).unwrap_or_default();
        let total = net.total();

        let shares = net
            .iter()
            .map(|(method, amount)| MethodShare {
                method,
                amount,
                percentage: if total.is_zero() {
                    0.0
                } else {
                    amount.as_f64() / total.as_f64() * 100.0
                },
            })
            .collect();

        Self { shares, total }
    }

    /// Shares ordered by amount, largest first
    pub fn ranked(&self) -> Vec<&MethodShare> {
        let mut ranked: Vec<_> = self.shares.iter().collect();
        ranked.sort_by(|a, b| b.amount.cmp(&a.amount));
        ranked
    }

    pub fn share(&self, method: PaymentMethod) -> Option<&MethodShare> {
        self.shares.iter().find(|s| s.method == method)
    }
}
