//! Payment intent gateway adapter
//!
//! Wraps the external payment processor's payment-intent endpoint. The
//! adapter converts the listing price to minor currency units, requests a
//! card-only intent in USD, and hands the resulting client secret back to
//! the caller; the intent itself stays with the gateway.

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Payment gateway configuration
#[derive(Debug, Clone)]
pub struct PaymentsConfig {
    /// Gateway secret key used as bearer credential
    pub secret_key: String,
    /// Gateway API base URL
    pub api_base: String,
}

impl PaymentsConfig {
    /// Create a new PaymentsConfig from environment variables
    ///
    /// # Environment Variables
    /// - `STRIPE_SECRET_KEY`: gateway secret key
    /// - `STRIPE_API_BASE`: gateway base URL (default: the public API)
    pub fn from_env() -> anyhow::Result<Self> {
        let secret_key = std::env::var("STRIPE_SECRET_KEY")
            .map_err(|_| anyhow::anyhow!("STRIPE_SECRET_KEY environment variable not set"))?;

        let api_base = std::env::var("STRIPE_API_BASE")
            .unwrap_or_else(|_| "https://api.stripe.com".to_string());

        Ok(PaymentsConfig {
            secret_key,
            api_base,
        })
    }
}

/// Errors that can occur when talking to the payment gateway
#[derive(Error, Debug)]
pub enum PaymentsError {
    /// Transport-level failure reaching the gateway
    #[error("Payment gateway request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway answered with a non-success status
    #[error("Payment gateway rejected the request: {0}")]
    Rejected(String),

    /// The gateway response carried no usable client secret
    #[error("Payment gateway response missing client secret")]
    MissingClientSecret,
}

#[derive(Debug, Deserialize)]
struct PaymentIntent {
    client_secret: Option<String>,
}

/// Payment gateway client
#[derive(Clone)]
pub struct PaymentsClient {
    http: reqwest::Client,
    config: PaymentsConfig,
}

impl PaymentsClient {
    /// Create a new payments client
    pub fn new(config: PaymentsConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Create a card-only USD payment intent for the given price and return
    /// the client secret needed to confirm it client-side
    pub async fn create_intent(&self, price: f64) -> Result<String, PaymentsError> {
        let amount = to_minor_units(price);
        info!("Creating payment intent for {} minor units", amount);

        let params = [
            ("amount", amount.to_string()),
            ("currency", "usd".to_string()),
            ("payment_method_types[]", "card".to_string()),
        ];

        let response = self
            .http
            .post(format!("{}/v1/payment_intents", self.config.api_base))
            .bearer_auth(&self.config.secret_key)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentsError::Rejected(format!("{}: {}", status, body)));
        }

        let intent: PaymentIntent = response.json().await?;

        match intent.client_secret {
            Some(secret) if !secret.is_empty() => Ok(secret),
            _ => Err(PaymentsError::MissingClientSecret),
        }
    }
}

/// Convert a decimal price to the smallest currency unit
pub fn to_minor_units(price: f64) -> i64 {
    (price * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, routing::post};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_to_minor_units() {
        assert_eq!(to_minor_units(19.99), 1999);
        assert_eq!(to_minor_units(100.0), 10000);
        assert_eq!(to_minor_units(0.5), 50);
        assert_eq!(to_minor_units(1.0), 100);
    }

    #[tokio::test]
    async fn test_create_intent_sends_minor_units_and_returns_secret() {
        let captured: Arc<Mutex<String>> = Arc::default();

        let app = Router::new().route("/v1/payment_intents", {
            let captured = captured.clone();
            post(move |body: String| {
                let captured = captured.clone();
                async move {
                    *captured.lock().unwrap() = body;
                    Json(serde_json::json!({
                        "id": "pi_test",
                        "client_secret": "pi_test_secret"
                    }))
                }
            })
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = PaymentsClient::new(PaymentsConfig {
            secret_key: "sk_test_123".to_string(),
            api_base: format!("http://{}", addr),
        });

        let secret = client.create_intent(19.99).await.unwrap();
        assert_eq!(secret, "pi_test_secret");

        let body = captured.lock().unwrap().clone();
        assert!(body.contains("amount=1999"));
        assert!(body.contains("currency=usd"));
        assert!(body.contains("payment_method_types%5B%5D=card"));
    }

    #[tokio::test]
    async fn test_create_intent_maps_gateway_rejection() {
        let app = Router::new().route(
            "/v1/payment_intents",
            post(|| async {
                (
                    axum::http::StatusCode::PAYMENT_REQUIRED,
                    Json(serde_json::json!({ "error": { "message": "no funds" } })),
                )
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = PaymentsClient::new(PaymentsConfig {
            secret_key: "sk_test_123".to_string(),
            api_base: format!("http://{}", addr),
        });

        let err = client.create_intent(10.0).await.unwrap_err();
        assert!(matches!(err, PaymentsError::Rejected(_)));
    }
}
