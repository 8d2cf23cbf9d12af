use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Wallet,
    BankTransfer,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

impl TransactionStatus {
    /// Transitions allowed out of this status. Transactions only ever move
    /// forward; `Completed` and `Failed` are terminal.
    pub fn valid_transitions(&self) -> &'static [TransactionStatus] {
        match self {
            Self::Pending => &[Self::Processing, Self::Failed],
            Self::Processing => &[Self::Completed, Self::Failed],
            Self::Completed | Self::Failed => &[],
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub fn can_transition_to(&self, target: TransactionStatus) -> bool {
        self.valid_transitions().contains(&target)
    }
}

/// A purchase transaction. Append-only: records are never deleted, and once a
/// transaction reaches a terminal status its amounts are immutable.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Transaction {
    pub id: Uuid,
    pub buyer_id: String,
    /// Absent for platform-owned items; no commission applies then.
    pub seller_id: Option<String>,
    /// Caller-supplied reference to the purchased item or checkout session.
    pub reference_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub commission_rate: Decimal,
    pub commission_amount: Decimal,
    pub net_amount: Decimal,
    pub payment_method: PaymentMethod,
    pub status: TransactionStatus,
    /// Order id assigned by the gateway once the handshake succeeds.
    pub gateway_reference: Option<String>,
    pub frame_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        buyer_id: String,
        seller_id: Option<String>,
        reference_id: String,
        amount: Decimal,
        currency: String,
        commission_rate: Decimal,
        commission_amount: Decimal,
        net_amount: Decimal,
        payment_method: PaymentMethod,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            buyer_id,
            seller_id,
            reference_id,
            amount,
            currency,
            commission_rate,
            commission_amount,
            net_amount,
            payment_method,
            status: TransactionStatus::Pending,
            gateway_reference: None,
            frame_url: None,
            created_at: now,
            updated_at: now,
        }
    }
}
