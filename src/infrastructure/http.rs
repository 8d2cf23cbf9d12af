use crate::config::GatewayConfig;
use crate::domain::gateway::{BillingInfo, PaymentGateway};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct TokenRequest<'a> {
    secret: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Serialize)]
struct OrderRequest<'a> {
    token: &'a str,
    amount_minor_units: i64,
    currency: &'a str,
}

#[derive(Deserialize)]
struct OrderResponse {
    order_id: String,
}

#[derive(Serialize)]
struct PaymentKeyRequest<'a> {
    token: &'a str,
    order_id: &'a str,
    amount_minor_units: i64,
    billing_data: &'a BillingInfo,
}

#[derive(Deserialize)]
struct PaymentKeyResponse {
    payment_token: String,
}

/// Gateway client speaking the real HTTP protocol.
///
/// Each handshake step is one POST; transport failures and timeouts surface
/// as `Gateway` errors naming the step that failed, so the caller can mark
/// the transaction failed and retry with a fresh one.
pub struct HttpGateway {
    http: reqwest::Client,
    config: GatewayConfig,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PaymentError::Gateway(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    async fn post_json<Req: Serialize, Resp: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        step: &str,
        body: &Req,
    ) -> Result<Resp> {
        let url = format!("{}{path}", self.config.base_url);
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| PaymentError::Gateway(format!("{step} failed: {e}")))?
            .error_for_status()
            .map_err(|e| PaymentError::Gateway(format!("{step} rejected: {e}")))?;
        response
            .json()
            .await
            .map_err(|e| PaymentError::Gateway(format!("{step} returned malformed body: {e}")))
    }
}

#[async_trait]
impl PaymentGateway for HttpGateway {
    async fn acquire_token(&self) -> Result<String> {
        let response: TokenResponse = self
            .post_json(
                "/auth/tokens",
                "token acquisition",
                &TokenRequest {
                    secret: &self.config.api_secret,
                },
            )
            .await?;
        Ok(response.token)
    }

    async fn create_order(
        &self,
        token: &str,
        amount_minor_units: i64,
        currency: &str,
    ) -> Result<String> {
        let response: OrderResponse = self
            .post_json(
                "/orders",
                "order creation",
                &OrderRequest {
                    token,
                    amount_minor_units,
                    currency,
                },
            )
            .await?;
        Ok(response.order_id)
    }

    async fn issue_payment_key(
        &self,
        token: &str,
        order_id: &str,
        amount_minor_units: i64,
        billing: &BillingInfo,
    ) -> Result<String> {
        let response: PaymentKeyResponse = self
            .post_json(
                "/payment_keys",
                "payment key issuance",
                &PaymentKeyRequest {
                    token,
                    order_id,
                    amount_minor_units,
                    billing_data: billing,
                },
            )
            .await?;
        Ok(response.payment_token)
    }

    fn frame_url(&self, payment_token: &str) -> String {
        self.config.frame_url(payment_token)
    }

    fn origin(&self) -> &str {
        &self.config.origin
    }
}
