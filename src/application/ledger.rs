use crate::domain::balance::SellerBalance;
use crate::domain::commission::Commission;
use crate::domain::money::Amount;
use crate::domain::payout::{Payout, PayoutOutcome};
use crate::domain::ports::LedgerStoreBox;
use crate::domain::transaction::{Transaction, TransactionStatus};
use crate::error::Result;
use tracing::info;
use uuid::Uuid;

/// The settlement ledger.
///
/// Owns the append-only transaction/commission log and the mutable seller
/// balances behind a storage port, and is the only place balances are
/// mutated. Transactions move strictly forward via guarded compare-and-set;
/// balance operations are atomic per storage call, so concurrent payout
/// requests from one seller can never jointly overdraw.
pub struct Ledger {
    store: LedgerStoreBox,
}

impl Ledger {
    pub fn new(store: LedgerStoreBox) -> Self {
        Self { store }
    }

    pub async fn record_transaction(&self, tx: Transaction) -> Result<()> {
        info!(
            transaction_id = %tx.id,
            buyer = %tx.buyer_id,
            amount = %tx.amount,
            "recorded transaction"
        );
        self.store.record_transaction(tx).await
    }

    pub async fn transaction(&self, id: Uuid) -> Result<Option<Transaction>> {
        self.store.transaction(id).await
    }

    pub async fn transaction_by_reference(&self, reference_id: &str) -> Result<Option<Transaction>> {
        self.store.transaction_by_reference(reference_id).await
    }

    pub async fn attach_gateway_details(
        &self,
        id: Uuid,
        gateway_reference: String,
        frame_url: String,
    ) -> Result<Transaction> {
        self.store
            .attach_gateway_details(id, gateway_reference, frame_url)
            .await
    }

    /// Guarded compare-and-set on transaction status.
    pub async fn transition_transaction(
        &self,
        id: Uuid,
        from: TransactionStatus,
        to: TransactionStatus,
    ) -> Result<Transaction> {
        let tx = self.store.transition_transaction(id, from, to).await?;
        info!(transaction_id = %id, %from, %to, "transaction transitioned");
        Ok(tx)
    }

    /// Finalizes a Processing transaction: marks it Completed and, in the
    /// same atomic store operation, records the commission and credits the
    /// seller's net amount.
    pub async fn settle_completion(&self, id: Uuid) -> Result<Transaction> {
        let tx = self.store.complete_and_settle(id).await?;
        if let Some(seller) = &tx.seller_id {
            info!(
                transaction_id = %id,
                seller = %seller,
                net = %tx.net_amount,
                commission = %tx.commission_amount,
                "transaction settled"
            );
        } else {
            info!(transaction_id = %id, "transaction completed (no seller)");
        }
        Ok(tx)
    }

    pub async fn commission_for(&self, transaction_id: Uuid) -> Result<Option<Commission>> {
        self.store.commission_for(transaction_id).await
    }

    pub async fn credit_seller(&self, seller_id: &str, amount: Amount) -> Result<SellerBalance> {
        self.store.credit_seller(seller_id, amount.value()).await
    }

    /// Debits the available balance, holding the amount in the pending
    /// reservation until the matching payout resolves.
    pub async fn debit_seller(&self, seller_id: &str, amount: Amount) -> Result<SellerBalance> {
        self.store.debit_seller(seller_id, amount.value()).await
    }

    /// Reserves funds and records the payout in one atomic operation.
    pub async fn request_payout(&self, payout: Payout) -> Result<Payout> {
        self.store.reserve_for_payout(payout).await
    }

    pub async fn resolve_payout(&self, payout_id: Uuid, outcome: PayoutOutcome) -> Result<Payout> {
        self.store.resolve_payout(payout_id, outcome).await
    }

    pub async fn payout(&self, id: Uuid) -> Result<Option<Payout>> {
        self.store.payout(id).await
    }

    // Read-only query surface for dashboard UIs.

    /// Current balance for a seller; zeroed if nothing was ever credited.
    pub async fn balance_snapshot(&self, seller_id: &str) -> Result<SellerBalance> {
        Ok(self
            .store
            .balance(seller_id)
            .await?
            .unwrap_or_else(|| SellerBalance::new(seller_id)))
    }

    pub async fn transaction_history(&self, party: &str) -> Result<Vec<Transaction>> {
        self.store.transaction_history(party).await
    }

    pub async fn payout_history(&self, seller_id: &str) -> Result<Vec<Payout>> {
        self.store.payout_history(seller_id).await
    }

    pub async fn open_payouts(&self, seller_id: &str) -> Result<Vec<Payout>> {
        self.store.open_payouts(seller_id).await
    }
}
