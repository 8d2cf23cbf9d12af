use crate::domain::balance::SellerBalance;
use crate::domain::commission::Commission;
use crate::domain::payout::{Payout, PayoutOutcome, PayoutStatus};
use crate::domain::ports::LedgerStore;
use crate::domain::transaction::{Transaction, TransactionStatus};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct LedgerState {
    transactions: HashMap<Uuid, Transaction>,
    commissions: HashMap<Uuid, Commission>,
    balances: HashMap<String, SellerBalance>,
    payouts: HashMap<Uuid, Payout>,
}

/// A thread-safe in-memory ledger store.
///
/// All records live behind a single `Arc<RwLock>`, so every port operation
/// (compare-and-set transitions, settlement, payout reservation) executes
/// under one write lock and is atomic with respect to concurrent callers.
/// `Clone` shares the underlying state.
#[derive(Default, Clone)]
pub struct InMemoryLedgerStore {
    state: Arc<RwLock<LedgerState>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn record_transaction(&self, tx: Transaction) -> Result<()> {
        let mut state = self.state.write().await;
        state.transactions.insert(tx.id, tx);
        Ok(())
    }

    async fn transaction(&self, id: Uuid) -> Result<Option<Transaction>> {
        let state = self.state.read().await;
        Ok(state.transactions.get(&id).cloned())
    }

    async fn transaction_by_reference(&self, reference_id: &str) -> Result<Option<Transaction>> {
        let state = self.state.read().await;
        Ok(state
            .transactions
            .values()
            .find(|tx| tx.reference_id == reference_id)
            .cloned())
    }

    async fn transaction_history(&self, party: &str) -> Result<Vec<Transaction>> {
        let state = self.state.read().await;
        let mut txs: Vec<Transaction> = state
            .transactions
            .values()
            .filter(|tx| tx.buyer_id == party || tx.seller_id.as_deref() == Some(party))
            .cloned()
            .collect();
        txs.sort_by_key(|tx| tx.created_at);
        Ok(txs)
    }

    async fn attach_gateway_details(
        &self,
        id: Uuid,
        gateway_reference: String,
        frame_url: String,
    ) -> Result<Transaction> {
        let mut state = self.state.write().await;
        let tx = state
            .transactions
            .get_mut(&id)
            .ok_or_else(|| PaymentError::NotFound(format!("transaction {id}")))?;
        tx.gateway_reference = Some(gateway_reference);
        tx.frame_url = Some(frame_url);
        tx.updated_at = Utc::now();
        Ok(tx.clone())
    }

    async fn transition_transaction(
        &self,
        id: Uuid,
        from: TransactionStatus,
        to: TransactionStatus,
    ) -> Result<Transaction> {
        if !from.can_transition_to(to) {
            return Err(PaymentError::Validation(format!(
                "illegal transition {from} -> {to}"
            )));
        }
        let mut state = self.state.write().await;
        let tx = state
            .transactions
            .get_mut(&id)
            .ok_or_else(|| PaymentError::NotFound(format!("transaction {id}")))?;
        if tx.status != from {
            return Err(PaymentError::StateConflict {
                expected: from,
                actual: tx.status,
            });
        }
        tx.status = to;
        tx.updated_at = Utc::now();
        Ok(tx.clone())
    }

    async fn complete_and_settle(&self, id: Uuid) -> Result<Transaction> {
        let mut state = self.state.write().await;
        let tx = state
            .transactions
            .get_mut(&id)
            .ok_or_else(|| PaymentError::NotFound(format!("transaction {id}")))?;
        if tx.status != TransactionStatus::Processing {
            return Err(PaymentError::StateConflict {
                expected: TransactionStatus::Processing,
                actual: tx.status,
            });
        }
        tx.status = TransactionStatus::Completed;
        tx.updated_at = Utc::now();
        let tx = tx.clone();

        if let Some(seller_id) = &tx.seller_id {
            state.commissions.insert(
                tx.id,
                Commission::collected(
                    tx.id,
                    seller_id.clone(),
                    tx.commission_amount,
                    tx.commission_rate,
                ),
            );
            state
                .balances
                .entry(seller_id.clone())
                .or_insert_with(|| SellerBalance::new(seller_id.clone()))
                .credit(tx.net_amount);
        }
        Ok(tx)
    }

    async fn commission_for(&self, transaction_id: Uuid) -> Result<Option<Commission>> {
        let state = self.state.read().await;
        Ok(state.commissions.get(&transaction_id).cloned())
    }

    async fn balance(&self, seller_id: &str) -> Result<Option<SellerBalance>> {
        let state = self.state.read().await;
        Ok(state.balances.get(seller_id).cloned())
    }

    async fn credit_seller(&self, seller_id: &str, amount: Decimal) -> Result<SellerBalance> {
        let mut state = self.state.write().await;
        let balance = state
            .balances
            .entry(seller_id.to_string())
            .or_insert_with(|| SellerBalance::new(seller_id));
        balance.credit(amount);
        Ok(balance.clone())
    }

    async fn debit_seller(&self, seller_id: &str, amount: Decimal) -> Result<SellerBalance> {
        let mut state = self.state.write().await;
        let balance =
            state
                .balances
                .get_mut(seller_id)
                .ok_or(PaymentError::InsufficientBalance {
                    available: Decimal::ZERO,
                    requested: amount,
                })?;
        balance.reserve(amount)?;
        Ok(balance.clone())
    }

    async fn reserve_for_payout(&self, payout: Payout) -> Result<Payout> {
        let mut state = self.state.write().await;
        let balance = state.balances.get_mut(&payout.seller_id).ok_or(
            PaymentError::InsufficientBalance {
                available: Decimal::ZERO,
                requested: payout.amount,
            },
        )?;
        balance.reserve(payout.amount)?;
        state.payouts.insert(payout.id, payout.clone());
        Ok(payout)
    }

    async fn resolve_payout(&self, payout_id: Uuid, outcome: PayoutOutcome) -> Result<Payout> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let payout = state
            .payouts
            .get_mut(&payout_id)
            .ok_or_else(|| PaymentError::NotFound(format!("payout {payout_id}")))?;
        if payout.status != PayoutStatus::Requested {
            return Err(PaymentError::PayoutStateConflict(format!(
                "payout {payout_id} already resolved as {:?}",
                payout.status
            )));
        }

        let balance = state
            .balances
            .get_mut(&payout.seller_id)
            .ok_or_else(|| PaymentError::NotFound(format!("balance for {}", payout.seller_id)))?;
        payout.status = match outcome {
            PayoutOutcome::Processed => {
                balance.settle_withdrawal(payout.amount)?;
                PayoutStatus::Processed
            }
            PayoutOutcome::Rejected => {
                balance.release(payout.amount)?;
                PayoutStatus::Rejected
            }
        };
        payout.processed_at = Some(Utc::now());
        Ok(payout.clone())
    }

    async fn payout(&self, id: Uuid) -> Result<Option<Payout>> {
        let state = self.state.read().await;
        Ok(state.payouts.get(&id).cloned())
    }

    async fn payout_history(&self, seller_id: &str) -> Result<Vec<Payout>> {
        let state = self.state.read().await;
        let mut payouts: Vec<Payout> = state
            .payouts
            .values()
            .filter(|p| p.seller_id == seller_id)
            .cloned()
            .collect();
        payouts.sort_by_key(|p| p.created_at);
        Ok(payouts)
    }

    async fn open_payouts(&self, seller_id: &str) -> Result<Vec<Payout>> {
        let state = self.state.read().await;
        let mut payouts: Vec<Payout> = state
            .payouts
            .values()
            .filter(|p| p.seller_id == seller_id && p.status == PayoutStatus::Requested)
            .cloned()
            .collect();
        payouts.sort_by_key(|p| p.created_at);
        Ok(payouts)
    }
}
