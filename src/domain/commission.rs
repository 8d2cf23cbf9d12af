use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CommissionStatus {
    Collected,
}

/// The platform's cut of a completed seller transaction. Created exactly once
/// per completed transaction that has a seller.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Commission {
    pub transaction_id: Uuid,
    pub seller_id: String,
    pub amount: Decimal,
    pub rate: Decimal,
    pub status: CommissionStatus,
    pub collected_at: DateTime<Utc>,
}

impl Commission {
    pub fn collected(transaction_id: Uuid, seller_id: String, amount: Decimal, rate: Decimal) -> Self {
        Self {
            transaction_id,
            seller_id,
            amount,
            rate,
            status: CommissionStatus::Collected,
            collected_at: Utc::now(),
        }
    }
}
