//! Domain-specific inclusion rules
//!
//! Not every fetched record moves money the reconciliation should see:
//! unsettled room bookings haven't been paid yet, and the office's reserved
//! pending category tracks staff advances in a ledger of its own.

use serde::{Deserialize, Serialize};

use crate::models::{Direction, Domain, TransactionRecord};

/// Category the office uses for staff advances
pub const DEFAULT_PENDING_CATEGORY: &str = "Pending";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionRules {
    /// Count guest-house inflow only once the entry is settled
    #[serde(default = "default_true")]
    pub guest_house_settled_only: bool,

    /// Office category excluded from inflow (compared case-insensitively)
    #[serde(default = "default_pending_category")]
    pub office_pending_category: String,
}

fn default_true() -> bool {
    true
}

fn default_pending_category() -> String {
    DEFAULT_PENDING_CATEGORY.to_string()
}

impl Default for InclusionRules {
    fn default() -> Self {
        Self {
            guest_house_settled_only: true,
            office_pending_category: default_pending_category(),
        }
    }
}

impl InclusionRules {
    /// Whether a record belongs to the office staff-advance ledger
    pub fn is_pending(&self, record: &TransactionRecord) -> bool {
        record.domain == Domain::Office
            && record
                .category
                .trim()
                .eq_ignore_ascii_case(self.office_pending_category.trim())
    }

    /// Whether a record contributes to the reconciliation sums
    pub fn counts(&self, record: &TransactionRecord) -> bool {
        match record.direction {
            Direction::Out => record.payment_method.has_outflow_leg(),
            Direction::In => match record.domain {
                Domain::GuestHouse => !self.guest_house_settled_only || record.is_settled,
                Domain::Office => !self.is_pending(record),
                Domain::Restaurant => true,
            },
        }
    }
}
