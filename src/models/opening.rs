//! Opening balances per payment method

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::money::Money;
use super::payment::PaymentMethod;

/// Manually entered starting balance for each payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OpeningBalances {
    #[serde(default)]
    pub cash: Money,
    #[serde(default)]
    pub card: Money,
    #[serde(default)]
    pub pp: Money,
    #[serde(default)]
    pub ppc: Money,
    #[serde(default)]
    pub pps: Money,
}

impl OpeningBalances {
    pub fn get(&self, method: PaymentMethod) -> Money {
        match method {
            PaymentMethod::Cash => self.cash,
            PaymentMethod::Card => self.card,
            PaymentMethod::Pp => self.pp,
            PaymentMethod::Ppc => self.ppc,
            PaymentMethod::Pps => self.pps,
        }
    }

    pub fn set(&mut self, method: PaymentMethod, amount: Money) {
        let slot = match method {
            PaymentMethod::Cash => &mut self.cash,
            PaymentMethod::Card => &mut self.card,
            PaymentMethod::Pp => &mut self.pp,
            PaymentMethod::Ppc => &mut self.ppc,
            PaymentMethod::Pps => &mut self.pps,
        };
        *slot = amount;
    }

    /// Set from form input; anything non-numeric is stored as zero
    pub fn set_from_input(&mut self, method: PaymentMethod, input: &str) -> Money {
        let amount = match Money::parse(input) {
            Ok(amount) => amount,
            Err(_) => {
                warn!(%method, input, "non-numeric opening balance, using zero");
                Money::zero()
            }
        };
        self.set(method, amount);
        amount
    }

    /// Balances as an array in `PaymentMethod::ALL` order
    pub fn as_array(&self) -> [Money; 5] {
        PaymentMethod::ALL.map(|m| self.get(m))
    }

    pub fn total(&self) -> Money {
        self.as_array().iter().sum()
    }

    pub fn is_zero(&self) -> bool {
        self.as_array().iter().all(Money::is_zero)
    }
}
