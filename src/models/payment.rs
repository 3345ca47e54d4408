//! Payment methods, money direction and business domains

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Payment channel a transaction settled through
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    Cash,
    Card,
    /// Pooled payment channel
    #[serde(rename = "PP")]
    Pp,
    /// Partner channel C
    #[serde(rename = "PPC")]
    Ppc,
    /// Partner channel S
    #[serde(rename = "PPS")]
    Pps,
}

impl PaymentMethod {
    /// All methods in report column order
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::Pp,
        PaymentMethod::Ppc,
        PaymentMethod::Pps,
    ];

    /// Card money never leaves through the books; it has no outflow leg
    pub fn has_outflow_leg(&self) -> bool {
        !matches!(self, PaymentMethod::Card)
    }

    /// Column label used in grids and exports
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::Pp => "PP",
            PaymentMethod::Ppc => "PPC",
            PaymentMethod::Pps => "PPS",
        }
    }

    /// Position in `ALL`, used to index per-method arrays
    pub fn index(&self) -> usize {
        match self {
            PaymentMethod::Cash => 0,
            PaymentMethod::Card => 1,
            PaymentMethod::Pp => 2,
            PaymentMethod::Ppc => 3,
            PaymentMethod::Pps => 4,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" | "credit card" | "debit card" => Ok(PaymentMethod::Card),
            "pp" => Ok(PaymentMethod::Pp),
            "ppc" => Ok(PaymentMethod::Ppc),
            "pps" => Ok(PaymentMethod::Pps),
            other => Err(format!("Unknown payment method: {}", other)),
        }
    }
}

/// Whether money came in or went out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    In,
    Out,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in" | "credit" | "income" | "levana" => Ok(Direction::In),
            "out" | "debit" | "expense" | "aapvana" => Ok(Direction::Out),
            other => Err(format!("Unknown direction: {}", other)),
        }
    }
}

/// Business area a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Domain {
    GuestHouse,
    Restaurant,
    Office,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::GuestHouse, Domain::Restaurant, Domain::Office];

    /// Backend route segment for this domain
    pub fn endpoint(&self) -> &'static str {
        match self {
            Domain::GuestHouse => "entries",
            Domain::Restaurant => "restaurant",
            Domain::Office => "officebook",
        }
    }

    /// File stem used by the offline record source
    pub fn file_stem(&self) -> &'static str {
        match self {
            Domain::GuestHouse => "guest-house",
            Domain::Restaurant => "restaurant",
            Domain::Office => "office",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Domain::GuestHouse => "Guest House",
            Domain::Restaurant => "Restaurant",
            Domain::Office => "Office",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse_case_insensitive() {
        assert_eq!("CASH".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!(" ppc ".parse::<PaymentMethod>().unwrap(), PaymentMethod::Ppc);
        assert!("upi".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_card_has_no_outflow_leg() {
        assert!(!PaymentMethod::Card.has_outflow_leg());
        assert!(PaymentMethod::Cash.has_outflow_leg());
        assert!(PaymentMethod::Pps.has_outflow_leg());
    }

    #[test]
    fn test_method_index_matches_all() {
        for (i, method) in PaymentMethod::ALL.iter().enumerate() {
            assert_eq!(method.index(), i);
        }
    }

    #[test]
    fn test_method_serde() {
        let json = serde_json::to_string(&PaymentMethod::Pps).unwrap();
        assert_eq!(json, "\"PPS\"");
        let json = serde_json::to_string(&PaymentMethod::Cash).unwrap();
        assert_eq!(json, "\"CASH\"");
    }

    #[test]
    fn test_direction_parse_ledger_terms() {
        assert_eq!("Levana".parse::<Direction>().unwrap(), Direction::In);
        assert_eq!("aapvana".parse::<Direction>().unwrap(), Direction::Out);
        assert_eq!("debit".parse::<Direction>().unwrap(), Direction::Out);
    }
}
