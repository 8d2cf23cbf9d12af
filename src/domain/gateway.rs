use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Payer billing data bound to a gateway order, sourced from the identity
/// subsystem at checkout time.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct BillingInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
}

impl BillingInfo {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("city", &self.city),
        ] {
            if value.trim().is_empty() {
                return Err(PaymentError::Validation(format!(
                    "billing field `{field}` is required"
                )));
            }
        }
        Ok(())
    }
}

/// Charge details sent through the handshake. The amount crosses the wire in
/// integral minor units.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub amount_minor_units: i64,
    pub currency: String,
    pub billing: BillingInfo,
}

/// Successful outcome of the three-step handshake.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentAttempt {
    pub gateway_order_id: String,
    pub payment_token: String,
    pub frame_url: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CompletionOutcome {
    Success,
    Failure,
}

/// Asynchronous completion notification emitted by the gateway once the
/// payer finishes (or abandons) the payment frame. Untrusted input: the
/// declared origin must match the registered gateway origin before anything
/// else is looked at.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct CompletionNotice {
    pub origin: String,
    pub outcome: CompletionOutcome,
    pub gateway_reference: Option<String>,
}

/// External payment gateway, driven as a sequential three-step handshake.
///
/// Each step is a distinct external call; a failure at any step aborts the
/// rest. There are no internal retries — a retry is the caller's job and must
/// allocate a fresh gateway order via a fresh transaction, never resume a
/// partially-created one.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Step 1: authenticate with the shared secret.
    async fn acquire_token(&self) -> Result<String>;

    /// Step 2: register the charge amount, in minor units.
    async fn create_order(&self, token: &str, amount_minor_units: i64, currency: &str)
    -> Result<String>;

    /// Step 3: bind billing data to the order.
    async fn issue_payment_key(
        &self,
        token: &str,
        order_id: &str,
        amount_minor_units: i64,
        billing: &BillingInfo,
    ) -> Result<String>;

    /// URL of the hosted payment frame for an issued payment token.
    fn frame_url(&self, payment_token: &str) -> String;

    /// Registered origin used to validate completion notifications.
    fn origin(&self) -> &str;

    /// Runs the handshake in order, aborting on the first failed step.
    async fn process_payment(&self, request: &PaymentRequest) -> Result<PaymentAttempt> {
        let token = self.acquire_token().await?;
        let order_id = self
            .create_order(&token, request.amount_minor_units, &request.currency)
            .await?;
        let payment_token = self
            .issue_payment_key(&token, &order_id, request.amount_minor_units, &request.billing)
            .await?;
        Ok(PaymentAttempt {
            frame_url: self.frame_url(&payment_token),
            gateway_order_id: order_id,
            payment_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn billing() -> BillingInfo {
        BillingInfo {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+201000000000".to_string(),
            city: "Cairo".to_string(),
        }
    }

    #[test]
    fn test_billing_validation() {
        assert!(billing().validate().is_ok());

        let mut missing = billing();
        missing.email = "  ".to_string();
        assert!(matches!(
            missing.validate(),
            Err(PaymentError::Validation(_))
        ));
    }

    #[test]
    fn test_notice_deserialization() {
        let json = r#"{"origin":"gateway.example.com","outcome":"success","gateway_reference":"ord_1"}"#;
        let notice: CompletionNotice = serde_json::from_str(json).unwrap();
        assert_eq!(notice.outcome, CompletionOutcome::Success);
        assert_eq!(notice.gateway_reference.as_deref(), Some("ord_1"));
    }
}
