use crate::error::PaymentError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Represents a positive monetary amount.
///
/// This is a wrapper around `rust_decimal::Decimal` to enforce that charge and
/// payout amounts are always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, PaymentError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(PaymentError::Validation(
                "amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = PaymentError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// A commission rate expressed as a percentage of the gross amount.
///
/// Valid range is 0 to 100 inclusive; anything else is a validation error
/// raised at construction.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct CommissionRate(Decimal);

impl CommissionRate {
    pub fn new(percent: Decimal) -> Result<Self, PaymentError> {
        if percent >= Decimal::ZERO && percent <= dec!(100) {
            Ok(Self(percent))
        } else {
            Err(PaymentError::Validation(format!(
                "commission rate {percent} out of range [0, 100]"
            )))
        }
    }

    pub fn percent(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for CommissionRate {
    type Error = PaymentError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Platform commission on `amount` at `rate_percent`, rounded half-up to the
/// currency's minor unit. The rate is clamped to [0, 100]; rejecting an
/// out-of-range rate is the caller's job via [`CommissionRate`].
pub fn commission(amount: Decimal, rate_percent: Decimal) -> Decimal {
    let rate = rate_percent.clamp(Decimal::ZERO, dec!(100));
    (amount * rate / dec!(100)).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Amount credited to the seller after commission deduction.
pub fn net(amount: Decimal, rate_percent: Decimal) -> Decimal {
    amount - commission(amount, rate_percent)
}

/// Converts an amount to integral minor units (e.g. cents) for the wire
/// boundary, so no floating rounding happens gateway-side.
pub fn to_minor_units(amount: Decimal) -> Result<i64, PaymentError> {
    (amount * dec!(100))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(|| PaymentError::Validation(format!("amount {amount} out of range")))
}

/// Converts integral minor units back to a decimal amount.
pub fn from_minor_units(minor_units: i64) -> Decimal {
    Decimal::new(minor_units, 2)
}
