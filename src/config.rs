use std::time::Duration;

/// Connection settings for the external payment gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the gateway API, without a trailing slash.
    pub base_url: String,
    /// Shared secret presented when acquiring an auth token.
    pub api_secret: String,
    /// Identifier of the hosted payment frame the gateway serves.
    pub frame_id: String,
    /// Registered origin of the gateway. Completion notifications declaring
    /// any other origin are dropped.
    pub origin: String,
    /// Timeout applied to each handshake call.
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://gateway.example.com/api".to_string(),
            api_secret: String::new(),
            frame_id: "checkout".to_string(),
            origin: "gateway.example.com".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("GATEWAY_BASE_URL").unwrap_or(defaults.base_url),
            api_secret: std::env::var("GATEWAY_API_SECRET").unwrap_or(defaults.api_secret),
            frame_id: std::env::var("GATEWAY_FRAME_ID").unwrap_or(defaults.frame_id),
            origin: std::env::var("GATEWAY_ORIGIN").unwrap_or(defaults.origin),
            timeout: std::env::var("GATEWAY_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }

    /// URL of the payment frame for a given payment token.
    pub fn frame_url(&self, payment_token: &str) -> String {
        format!(
            "{}/frames/{}?payment_token={}",
            self.base_url, self.frame_id, payment_token
        )
    }
}
