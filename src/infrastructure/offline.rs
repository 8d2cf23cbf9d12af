use crate::domain::gateway::{BillingInfo, PaymentGateway};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeStep {
    Token,
    Order,
    PaymentKey,
}

/// A gateway that never leaves the process.
///
/// Mints sequential order ids and payment tokens, so replays and tests are
/// deterministic. Failure paths are scriptable: a step can be forced to fail,
/// and orders above a decline threshold are rejected the way a real gateway
/// declines a charge.
pub struct OfflineGateway {
    origin: String,
    counter: AtomicU64,
    fail_at: Option<HandshakeStep>,
    decline_over_minor_units: Option<i64>,
}

impl OfflineGateway {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            counter: AtomicU64::new(0),
            fail_at: None,
            decline_over_minor_units: None,
        }
    }

    /// Forces the given handshake step to fail.
    pub fn failing_at(mut self, step: HandshakeStep) -> Self {
        self.fail_at = Some(step);
        self
    }

    /// Declines order creation for amounts above `minor_units`.
    pub fn declining_over(mut self, minor_units: i64) -> Self {
        self.decline_over_minor_units = Some(minor_units);
        self
    }

    fn check_step(&self, step: HandshakeStep, name: &str) -> Result<()> {
        if self.fail_at == Some(step) {
            Err(PaymentError::Gateway(format!("{name} failed: forced failure")))
        } else {
            Ok(())
        }
    }

    fn next_seq(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed) + 1
    }
}

#[async_trait]
impl PaymentGateway for OfflineGateway {
    async fn acquire_token(&self) -> Result<String> {
        self.check_step(HandshakeStep::Token, "token acquisition")?;
        Ok(format!("auth_{}", self.next_seq()))
    }

    async fn create_order(
        &self,
        _token: &str,
        amount_minor_units: i64,
        currency: &str,
    ) -> Result<String> {
        self.check_step(HandshakeStep::Order, "order creation")?;
        if let Some(limit) = self.decline_over_minor_units
            && amount_minor_units > limit
        {
            return Err(PaymentError::Gateway(format!(
                "order creation declined: {amount_minor_units} {currency} exceeds limit"
            )));
        }
        Ok(format!("ord_{}", self.next_seq()))
    }

    async fn issue_payment_key(
        &self,
        _token: &str,
        order_id: &str,
        _amount_minor_units: i64,
        billing: &BillingInfo,
    ) -> Result<String> {
        self.check_step(HandshakeStep::PaymentKey, "payment key issuance")?;
        billing.validate()?;
        Ok(format!("pk_{order_id}_{}", self.next_seq()))
    }

    fn frame_url(&self, payment_token: &str) -> String {
        format!(
            "https://{}/frames/offline?payment_token={payment_token}",
            self.origin
        )
    }

    fn origin(&self) -> &str {
        &self.origin
    }
}
