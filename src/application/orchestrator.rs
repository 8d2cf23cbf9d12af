use crate::application::ledger::Ledger;
use crate::domain::gateway::{
    BillingInfo, CompletionNotice, CompletionOutcome, PaymentGateway, PaymentRequest,
};
use crate::domain::money::{self, Amount, CommissionRate};
use crate::domain::transaction::{PaymentMethod, Transaction, TransactionStatus};
use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Checkout input assembled by the caller from the identity and catalog
/// subsystems.
#[derive(Debug, Clone)]
pub struct InitiateRequest {
    pub buyer_id: String,
    pub seller_id: Option<String>,
    pub reference_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub commission_rate: Decimal,
    pub payment_method: PaymentMethod,
    pub billing: BillingInfo,
}

/// What the checkout UI needs back: the frame URL to embed, plus the ids to
/// correlate the eventual completion notification.
#[derive(Debug, Clone, PartialEq)]
pub struct InitiateOutcome {
    pub transaction_id: Uuid,
    pub gateway_reference: String,
    pub frame_url: String,
}

/// Drives the purchase lifecycle: PENDING -> PROCESSING -> {COMPLETED, FAILED}.
///
/// Takes the gateway and the ledger as constructor parameters so tests can
/// substitute fakes for either.
pub struct PaymentOrchestrator {
    gateway: Arc<dyn PaymentGateway>,
    ledger: Arc<Ledger>,
}

impl PaymentOrchestrator {
    pub fn new(gateway: Arc<dyn PaymentGateway>, ledger: Arc<Ledger>) -> Self {
        Self { gateway, ledger }
    }

    /// Starts a purchase: validates the request, records a PENDING
    /// transaction, runs the gateway handshake, and returns the payment-frame
    /// URL. A handshake failure marks the transaction FAILED and surfaces the
    /// gateway error; retrying is the caller's job and always starts a fresh
    /// transaction (and therefore a fresh gateway order).
    pub async fn initiate(&self, request: InitiateRequest) -> Result<InitiateOutcome> {
        let amount = Amount::new(request.amount)?;
        let rate = CommissionRate::new(request.commission_rate)?;
        request.billing.validate()?;
        let amount_minor_units = money::to_minor_units(amount.value())?;

        // Commission applies only when a seller takes the proceeds.
        let (commission_amount, net_amount) = match request.seller_id {
            Some(_) => (
                money::commission(amount.value(), rate.percent()),
                money::net(amount.value(), rate.percent()),
            ),
            None => (Decimal::ZERO, amount.value()),
        };

        let tx = Transaction::new(
            request.buyer_id,
            request.seller_id,
            request.reference_id,
            amount.value(),
            request.currency.clone(),
            rate.percent(),
            commission_amount,
            net_amount,
            request.payment_method,
        );
        let tx_id = tx.id;
        self.ledger.record_transaction(tx).await?;

        let wire = PaymentRequest {
            amount_minor_units,
            currency: request.currency,
            billing: request.billing,
        };
        match self.gateway.process_payment(&wire).await {
            Ok(attempt) => {
                self.ledger
                    .attach_gateway_details(
                        tx_id,
                        attempt.gateway_order_id.clone(),
                        attempt.frame_url.clone(),
                    )
                    .await?;
                self.ledger
                    .transition_transaction(
                        tx_id,
                        TransactionStatus::Pending,
                        TransactionStatus::Processing,
                    )
                    .await?;
                info!(
                    transaction_id = %tx_id,
                    gateway_reference = %attempt.gateway_order_id,
                    "payment initiated"
                );
                Ok(InitiateOutcome {
                    transaction_id: tx_id,
                    gateway_reference: attempt.gateway_order_id,
                    frame_url: attempt.frame_url,
                })
            }
            Err(err) => {
                self.ledger
                    .transition_transaction(
                        tx_id,
                        TransactionStatus::Pending,
                        TransactionStatus::Failed,
                    )
                    .await?;
                warn!(transaction_id = %tx_id, error = %err, "gateway handshake failed");
                Err(err)
            }
        }
    }

    /// Handles the gateway's asynchronous completion notification.
    ///
    /// The notification channel is unordered and may deliver duplicates; the
    /// guarded compare-and-set on status serializes concurrent deliveries so
    /// the seller is credited at most once. A notice whose declared origin
    /// does not match the registered gateway origin is logged and dropped
    /// without touching any state — returning Ok so the sender learns
    /// nothing, not even whether the transaction id exists.
    pub async fn confirm_completion(
        &self,
        transaction_id: Uuid,
        notice: CompletionNotice,
    ) -> Result<()> {
        if notice.origin != self.gateway.origin() {
            let err = PaymentError::InvalidOrigin {
                declared: notice.origin,
            };
            warn!(transaction_id = %transaction_id, %err, "dropping completion notice");
            return Ok(());
        }

        let tx = self
            .ledger
            .transaction(transaction_id)
            .await?
            .ok_or_else(|| PaymentError::NotFound(format!("transaction {transaction_id}")))?;

        match notice.outcome {
            CompletionOutcome::Success => {
                if tx.status == TransactionStatus::Completed {
                    // Duplicate delivery of a notice we already applied.
                    return Ok(());
                }
                match self.ledger.settle_completion(transaction_id).await {
                    Ok(_) => Ok(()),
                    // Lost the race against a concurrent duplicate: the
                    // winner already settled, which is the outcome we wanted.
                    Err(PaymentError::StateConflict {
                        actual: TransactionStatus::Completed,
                        ..
                    }) => Ok(()),
                    Err(err) => Err(err),
                }
            }
            CompletionOutcome::Failure => {
                if tx.status == TransactionStatus::Failed {
                    return Ok(());
                }
                match self
                    .ledger
                    .transition_transaction(
                        transaction_id,
                        TransactionStatus::Processing,
                        TransactionStatus::Failed,
                    )
                    .await
                {
                    Ok(_) => Ok(()),
                    Err(PaymentError::StateConflict {
                        actual: TransactionStatus::Failed,
                        ..
                    }) => Ok(()),
                    Err(err) => Err(err),
                }
            }
        }
    }

    /// Status lookup, so a transaction stuck in PENDING or PROCESSING is
    /// always reachable for reconciliation.
    pub async fn transaction(&self, id: Uuid) -> Result<Option<Transaction>> {
        self.ledger.transaction(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::in_memory::InMemoryLedgerStore;
    use crate::infrastructure::offline::{HandshakeStep, OfflineGateway};
    use rust_decimal_macros::dec;

    const ORIGIN: &str = "gateway.example.com";

    fn billing() -> BillingInfo {
        BillingInfo {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+201000000000".to_string(),
            city: "Cairo".to_string(),
        }
    }

    fn request() -> InitiateRequest {
        InitiateRequest {
            buyer_id: "buyer-1".to_string(),
            seller_id: Some("seller-1".to_string()),
            reference_id: "course-9".to_string(),
            amount: dec!(100.00),
            currency: "EGP".to_string(),
            commission_rate: dec!(5),
            payment_method: PaymentMethod::Card,
            billing: billing(),
        }
    }

    fn orchestrator(gateway: OfflineGateway) -> (PaymentOrchestrator, Arc<Ledger>) {
        let ledger = Arc::new(Ledger::new(Box::new(InMemoryLedgerStore::new())));
        (
            PaymentOrchestrator::new(Arc::new(gateway), ledger.clone()),
            ledger,
        )
    }

    fn success_notice() -> CompletionNotice {
        CompletionNotice {
            origin: ORIGIN.to_string(),
            outcome: CompletionOutcome::Success,
            gateway_reference: None,
        }
    }

    #[tokio::test]
    async fn test_initiate_moves_to_processing() {
        let (orchestrator, ledger) = orchestrator(OfflineGateway::new(ORIGIN));
        let outcome = orchestrator.initiate(request()).await.unwrap();

        let tx = ledger
            .transaction(outcome.transaction_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(tx.status, TransactionStatus::Processing);
        assert_eq!(tx.commission_amount, dec!(5.00));
        assert_eq!(tx.net_amount, dec!(95.00));
        assert_eq!(tx.gateway_reference.as_deref(), Some(outcome.gateway_reference.as_str()));
        assert!(outcome.frame_url.contains("payment_token="));
    }

    #[tokio::test]
    async fn test_initiate_rejects_bad_rate() {
        let (orchestrator, _) = orchestrator(OfflineGateway::new(ORIGIN));
        let mut req = request();
        req.commission_rate = dec!(101);
        assert!(matches!(
            orchestrator.initiate(req).await,
            Err(PaymentError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_order_failure_marks_failed_without_balance_mutation() {
        let (orchestrator, ledger) =
            orchestrator(OfflineGateway::new(ORIGIN).failing_at(HandshakeStep::Order));
        let err = orchestrator.initiate(request()).await.unwrap_err();
        assert!(matches!(err, PaymentError::Gateway(_)));

        let history = ledger.transaction_history("buyer-1").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, TransactionStatus::Failed);

        let balance = ledger.balance_snapshot("seller-1").await.unwrap();
        assert_eq!(balance.available_balance, dec!(0));
        assert_eq!(balance.total_earned, dec!(0));
    }

    #[tokio::test]
    async fn test_confirmation_settles_seller() {
        let (orchestrator, ledger) = orchestrator(OfflineGateway::new(ORIGIN));
        let outcome = orchestrator.initiate(request()).await.unwrap();

        orchestrator
            .confirm_completion(outcome.transaction_id, success_notice())
            .await
            .unwrap();

        let tx = ledger
            .transaction(outcome.transaction_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(tx.status, TransactionStatus::Completed);
        let balance = ledger.balance_snapshot("seller-1").await.unwrap();
        assert_eq!(balance.available_balance, dec!(95.00));
        assert!(
            ledger
                .commission_for(outcome.transaction_id)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_duplicate_confirmation_credits_once() {
        let (orchestrator, ledger) = orchestrator(OfflineGateway::new(ORIGIN));
        let outcome = orchestrator.initiate(request()).await.unwrap();

        orchestrator
            .confirm_completion(outcome.transaction_id, success_notice())
            .await
            .unwrap();
        orchestrator
            .confirm_completion(outcome.transaction_id, success_notice())
            .await
            .unwrap();

        let balance = ledger.balance_snapshot("seller-1").await.unwrap();
        assert_eq!(balance.available_balance, dec!(95.00));
        assert_eq!(balance.total_earned, dec!(95.00));
    }

    #[tokio::test]
    async fn test_concurrent_confirmations_credit_once() {
        let (orchestrator, ledger) = orchestrator(OfflineGateway::new(ORIGIN));
        let orchestrator = Arc::new(orchestrator);
        let outcome = orchestrator.initiate(request()).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let orchestrator = orchestrator.clone();
            let id = outcome.transaction_id;
            handles.push(tokio::spawn(async move {
                orchestrator.confirm_completion(id, success_notice()).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let balance = ledger.balance_snapshot("seller-1").await.unwrap();
        assert_eq!(balance.available_balance, dec!(95.00));
        assert_eq!(balance.total_earned, dec!(95.00));
    }

    #[tokio::test]
    async fn test_mismatched_origin_is_dropped_silently() {
        let (orchestrator, ledger) = orchestrator(OfflineGateway::new(ORIGIN));
        let outcome = orchestrator.initiate(request()).await.unwrap();

        let spoofed = CompletionNotice {
            origin: "attacker.example.net".to_string(),
            outcome: CompletionOutcome::Success,
            gateway_reference: None,
        };
        // Dropped, not surfaced: the sender cannot even tell the id is real.
        orchestrator
            .confirm_completion(outcome.transaction_id, spoofed.clone())
            .await
            .unwrap();
        orchestrator
            .confirm_completion(Uuid::new_v4(), spoofed)
            .await
            .unwrap();

        let tx = ledger
            .transaction(outcome.transaction_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(tx.status, TransactionStatus::Processing);
        let balance = ledger.balance_snapshot("seller-1").await.unwrap();
        assert_eq!(balance.available_balance, dec!(0));
    }

    #[tokio::test]
    async fn test_failure_notice_marks_failed_idempotently() {
        let (orchestrator, ledger) = orchestrator(OfflineGateway::new(ORIGIN));
        let outcome = orchestrator.initiate(request()).await.unwrap();

        let notice = CompletionNotice {
            origin: ORIGIN.to_string(),
            outcome: CompletionOutcome::Failure,
            gateway_reference: None,
        };
        orchestrator
            .confirm_completion(outcome.transaction_id, notice.clone())
            .await
            .unwrap();
        orchestrator
            .confirm_completion(outcome.transaction_id, notice)
            .await
            .unwrap();

        let tx = ledger
            .transaction(outcome.transaction_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(tx.status, TransactionStatus::Failed);
    }

    #[tokio::test]
    async fn test_purchase_without_seller_keeps_full_amount() {
        let (orchestrator, ledger) = orchestrator(OfflineGateway::new(ORIGIN));
        let mut req = request();
        req.seller_id = None;
        let outcome = orchestrator.initiate(req).await.unwrap();

        orchestrator
            .confirm_completion(outcome.transaction_id, success_notice())
            .await
            .unwrap();

        let tx = ledger
            .transaction(outcome.transaction_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(tx.commission_amount, dec!(0));
        assert_eq!(tx.net_amount, dec!(100.00));
        assert!(
            ledger
                .commission_for(outcome.transaction_id)
                .await
                .unwrap()
                .is_none()
        );
    }
}
