use crate::domain::balance::SellerBalance;
use crate::domain::commission::Commission;
use crate::domain::payout::{Payout, PayoutOutcome};
use crate::domain::transaction::{Transaction, TransactionStatus};
use crate::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

pub type LedgerStoreBox = Box<dyn LedgerStore>;

/// Storage port for the settlement ledger.
///
/// Each method is an atomic unit: implementations must apply the whole
/// operation (status check, mutation, derived records) under a single
/// serialization scope so concurrent callers can never observe or produce a
/// half-applied state.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn record_transaction(&self, tx: Transaction) -> Result<()>;
    async fn transaction(&self, id: Uuid) -> Result<Option<Transaction>>;
    async fn transaction_by_reference(&self, reference_id: &str) -> Result<Option<Transaction>>;
    /// All transactions where `party` is the buyer or the seller.
    async fn transaction_history(&self, party: &str) -> Result<Vec<Transaction>>;

    /// Records the gateway order id and frame URL on a pending transaction.
    async fn attach_gateway_details(
        &self,
        id: Uuid,
        gateway_reference: String,
        frame_url: String,
    ) -> Result<Transaction>;

    /// Guarded compare-and-set on transaction status. Fails with
    /// `StateConflict` if the current status is not `from`.
    async fn transition_transaction(
        &self,
        id: Uuid,
        from: TransactionStatus,
        to: TransactionStatus,
    ) -> Result<Transaction>;

    /// Atomically moves a Processing transaction to Completed and applies its
    /// settlement: one Commission record (when a seller exists) and a seller
    /// credit of the net amount. Fails with `StateConflict` if the
    /// transaction is not Processing.
    async fn complete_and_settle(&self, id: Uuid) -> Result<Transaction>;

    async fn commission_for(&self, transaction_id: Uuid) -> Result<Option<Commission>>;

    async fn balance(&self, seller_id: &str) -> Result<Option<SellerBalance>>;
    /// Credits settled earnings; creates the balance on first credit.
    async fn credit_seller(&self, seller_id: &str, amount: Decimal) -> Result<SellerBalance>;
    /// Debits the available balance into the pending reservation. Fails with
    /// `InsufficientBalance` if `amount` exceeds the available balance.
    async fn debit_seller(&self, seller_id: &str, amount: Decimal) -> Result<SellerBalance>;

    /// Atomically reserves the payout amount (available to pending) and
    /// records the payout in Requested status.
    async fn reserve_for_payout(&self, payout: Payout) -> Result<Payout>;
    /// Resolves a Requested payout: Processed drains the reservation and bumps
    /// `total_withdrawn`, Rejected credits the reservation back to available.
    async fn resolve_payout(&self, payout_id: Uuid, outcome: PayoutOutcome) -> Result<Payout>;
    async fn payout(&self, id: Uuid) -> Result<Option<Payout>>;
    async fn payout_history(&self, seller_id: &str) -> Result<Vec<Payout>>;
    /// Requested payouts for a seller, oldest first.
    async fn open_payouts(&self, seller_id: &str) -> Result<Vec<Payout>>;
}
