use crate::error::PaymentError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents a seller's settled funds.
///
/// Tracks funds available for withdrawal, funds reserved by open payout
/// requests, and the lifetime earned/withdrawn counters. Invariants:
/// `available_balance >= 0` at all times; `total_earned` and `total_withdrawn`
/// never decrease.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct SellerBalance {
    pub seller_id: String,
    /// Funds the seller can withdraw.
    pub available_balance: Decimal,
    /// Funds reserved by payout requests that are not yet resolved.
    pub pending_balance: Decimal,
    pub total_earned: Decimal,
    pub total_withdrawn: Decimal,
}

impl SellerBalance {
    pub fn new(seller_id: impl Into<String>) -> Self {
        Self {
            seller_id: seller_id.into(),
            available_balance: Decimal::ZERO,
            pending_balance: Decimal::ZERO,
            total_earned: Decimal::ZERO,
            total_withdrawn: Decimal::ZERO,
        }
    }

    /// Credits settled earnings into the available balance.
    pub fn credit(&mut self, amount: Decimal) {
        self.available_balance += amount;
        self.total_earned += amount;
    }

    /// Moves funds from available to pending, reserving them for a payout.
    pub fn reserve(&mut self, amount: Decimal) -> Result<(), PaymentError> {
        if self.available_balance >= amount {
            self.available_balance -= amount;
            self.pending_balance += amount;
            Ok(())
        } else {
            Err(PaymentError::InsufficientBalance {
                available: self.available_balance,
                requested: amount,
            })
        }
    }

    /// Returns a reservation to the available balance (payout rejected).
    pub fn release(&mut self, amount: Decimal) -> Result<(), PaymentError> {
        if self.pending_balance >= amount {
            self.pending_balance -= amount;
            self.available_balance += amount;
            Ok(())
        } else {
            Err(PaymentError::PayoutStateConflict(format!(
                "cannot release {amount}, only {} reserved",
                self.pending_balance
            )))
        }
    }

    /// Drains a reservation after the payout is processed.
    pub fn settle_withdrawal(&mut self, amount: Decimal) -> Result<(), PaymentError> {
        if self.pending_balance >= amount {
            self.pending_balance -= amount;
            self.total_withdrawn += amount;
            Ok(())
        } else {
            Err(PaymentError::PayoutStateConflict(format!(
                "cannot settle {amount}, only {} reserved",
                self.pending_balance
            )))
        }
    }
}
