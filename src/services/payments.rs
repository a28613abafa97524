use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::PaymentConfig;

/// Charge authorization handed back to the client to confirm payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: Option<String>,
    pub client_secret: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("{0}")]
    InvalidAmount(String),

    #[error("payment processor is not configured")]
    NotConfigured,

    #[error("invalid payment API base: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("payment processor unreachable: {0}")]
    Http(#[from] reqwest::Error),

    #[error("payment processor rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("payment processor returned no client secret")]
    MissingClientSecret,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// `amount` is in major currency units and already validated.
    async fn create_intent(&self, amount: Decimal) -> Result<PaymentIntent, PaymentError>;
}

/// Checks a caller-supplied amount.
pub fn validate_amount(amount: Option<Decimal>) -> Result<Decimal, PaymentError> {
    match amount {
        None => Err(PaymentError::InvalidAmount("Amount is required".to_string())),
        Some(a) if a.is_zero() => Err(PaymentError::InvalidAmount("Amount is required".to_string())),
        Some(a) if a.is_sign_negative() => Err(PaymentError::InvalidAmount("Amount must be positive".to_string())),
        Some(a) => Ok(a),
    }
}

/// Convert major units to the processor's minor units (cents).
pub fn to_minor_units(amount: Decimal) -> Result<i64, PaymentError> {
    let cents = (amount * Decimal::ONE_HUNDRED)
        .round()
        .to_i64()
        .ok_or_else(|| PaymentError::InvalidAmount("Amount is too large".to_string()))?;
    if cents <= 0 {
        return Err(PaymentError::InvalidAmount("Amount is too small".to_string()));
    }
    Ok(cents)
}

#[derive(Debug, Deserialize)]
struct IntentResponse {
    id: Option<String>,
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Creates card payment intents through the Stripe REST API.
pub struct StripeGateway {
    client: reqwest::Client,
    endpoint: Url,
    secret_key: String,
    currency: String,
}

impl StripeGateway {
    pub fn new(config: &PaymentConfig) -> Result<Self, PaymentError> {
        let endpoint = Url::parse(&config.api_base)?.join("/v1/payment_intents")?;
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            secret_key: config.secret_key.clone(),
            currency: config.currency.clone(),
        })
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_intent(&self, amount: Decimal) -> Result<PaymentIntent, PaymentError> {
        if self.secret_key.is_empty() {
            return Err(PaymentError::NotConfigured);
        }
        let cents = to_minor_units(amount)?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.secret_key)
            .form(&[
                ("amount", cents.to_string()),
                ("currency", self.currency.clone()),
                ("payment_method_types[]", "card".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .and_then(|e| e.error.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
            return Err(PaymentError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let intent = response.json::<IntentResponse>().await?;
        tracing::debug!("Created payment intent {:?} for {} minor units", intent.id, cents);

        Ok(PaymentIntent {
            id: intent.id,
            client_secret: intent.client_secret.ok_or(PaymentError::MissingClientSecret)?,
        })
    }
}
