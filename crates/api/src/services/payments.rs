//! Payment processor integration (Stripe Checkout).
//!
//! Only the one call this service needs is implemented: creating a hosted
//! checkout session. Routes talk to the [`PaymentGateway`] trait so tests
//! can swap in a recording mock.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error};

use domain::models::payment::{METADATA_EVENT_TITLE, METADATA_RESERVATION_ID};

use crate::config::PaymentsConfig;

/// Errors that can occur when calling the payment processor.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Payment processor not configured: {0}")]
    NotConfigured(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Payment processor returned {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("Invalid response from payment processor: {0}")]
    InvalidResponse(String),
}

/// Everything needed to open a hosted checkout page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSessionParams {
    pub reservation_id: String,
    pub event_title: String,
    /// Price per person in minor units (haléř).
    pub unit_amount: i64,
    pub quantity: i32,
    pub currency: String,
    pub customer_email: String,
    pub success_url: String,
    pub cancel_url: String,
}

impl CheckoutSessionParams {
    /// Form fields in the processor's bracket notation.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        vec![
            ("mode".into(), "payment".into()),
            ("payment_method_types[0]".into(), "card".into()),
            ("customer_email".into(), self.customer_email.clone()),
            (
                "line_items[0][price_data][currency]".into(),
                self.currency.clone(),
            ),
            (
                "line_items[0][price_data][product_data][name]".into(),
                self.event_title.clone(),
            ),
            (
                "line_items[0][price_data][unit_amount]".into(),
                self.unit_amount.to_string(),
            ),
            ("line_items[0][quantity]".into(), self.quantity.to_string()),
            (
                format!("metadata[{}]", METADATA_RESERVATION_ID),
                self.reservation_id.clone(),
            ),
            (
                format!("metadata[{}]", METADATA_EVENT_TITLE),
                self.event_title.clone(),
            ),
            ("success_url".into(), self.success_url.clone()),
            ("cancel_url".into(), self.cancel_url.clone()),
        ]
    }
}

/// A created checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout_session(
        &self,
        params: &CheckoutSessionParams,
    ) -> Result<CheckoutSession, PaymentError>;
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

/// Stripe REST client.
#[derive(Clone)]
pub struct StripeGateway {
    client: Client,
    secret_key: String,
    api_base_url: String,
}

impl std::fmt::Debug for StripeGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeGateway")
            .field("api_base_url", &self.api_base_url)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

impl StripeGateway {
    pub fn new(config: &PaymentsConfig) -> Result<Self, PaymentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            secret_key: config.stripe_secret_key.clone(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_checkout_session(
        &self,
        params: &CheckoutSessionParams,
    ) -> Result<CheckoutSession, PaymentError> {
        if self.secret_key.is_empty() {
            return Err(PaymentError::NotConfigured(
                "stripe_secret_key is empty".to_string(),
            ));
        }

        let url = format!("{}/v1/checkout/sessions", self.api_base_url);
        debug!(
            reservation_id = %params.reservation_id,
            quantity = params.quantity,
            unit_amount = params.unit_amount,
            "Creating checkout session"
        );

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.secret_key, Some(""))
            .form(&params.form_fields())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<StripeErrorBody>(&body)
                .ok()
                .and_then(|b| b.error.message)
                .unwrap_or(body);
            error!(status = %status, error = %message, "Stripe API error");
            return Err(PaymentError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let session: CheckoutSession = response
            .json()
            .await
            .map_err(|e| PaymentError::InvalidResponse(e.to_string()))?;
        if session.url.is_none() {
            return Err(PaymentError::InvalidResponse(
                "checkout session has no url".to_string(),
            ));
        }
        Ok(session)
    }
}
