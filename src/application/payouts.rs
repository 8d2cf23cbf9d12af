use crate::application::ledger::Ledger;
use crate::domain::money::Amount;
use crate::domain::payout::{Payout, PayoutOutcome};
use crate::domain::transaction::PaymentMethod;
use crate::error::Result;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Seller-initiated withdrawals against the ledger.
///
/// Funds are reserved the moment a request is accepted, so two concurrent
/// requests can never jointly spend the same balance. Rejection releases the
/// reservation back to the available balance.
pub struct PayoutManager {
    ledger: Arc<Ledger>,
}

impl PayoutManager {
    pub fn new(ledger: Arc<Ledger>) -> Self {
        Self { ledger }
    }

    pub async fn request_payout(
        &self,
        seller_id: &str,
        amount: Decimal,
        method: PaymentMethod,
    ) -> Result<Payout> {
        let amount = Amount::new(amount)?;
        let payout = Payout::requested(seller_id, amount.value(), method);
        let payout = self.ledger.request_payout(payout).await?;
        info!(
            payout_id = %payout.id,
            seller = %seller_id,
            amount = %payout.amount,
            "payout requested"
        );
        Ok(payout)
    }

    pub async fn resolve_payout(&self, payout_id: Uuid, outcome: PayoutOutcome) -> Result<Payout> {
        let payout = self.ledger.resolve_payout(payout_id, outcome).await?;
        info!(payout_id = %payout.id, outcome = ?outcome, "payout resolved");
        Ok(payout)
    }
}
