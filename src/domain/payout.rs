use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::transaction::PaymentMethod;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PayoutStatus {
    Requested,
    Processed,
    Rejected,
}

/// Operator decision on a requested payout.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PayoutOutcome {
    Processed,
    Rejected,
}

/// A seller-initiated withdrawal. Funds are reserved when the request is
/// created, not when it is processed.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Payout {
    pub id: Uuid,
    pub seller_id: String,
    pub amount: Decimal,
    pub status: PayoutStatus,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl Payout {
    pub fn requested(seller_id: impl Into<String>, amount: Decimal, method: PaymentMethod) -> Self {
        Self {
            id: Uuid::new_v4(),
            seller_id: seller_id.into(),
            amount,
            status: PayoutStatus::Requested,
            payment_method: method,
            created_at: Utc::now(),
            processed_at: None,
        }
    }
}
