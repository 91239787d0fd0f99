use crate::config::{AppConfig, GatewayBackend};
use crate::domain::payment::ProcessPaymentCommand;
use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub mod cybersource;
pub mod mock;
pub mod signing;
pub mod wire;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    pub merchant_customer_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub address1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    pub locality: String,
    pub administrative_area: String,
    pub postal_code: String,
    pub country: String,
}

impl CustomerProfile {
    pub fn from_command(cmd: &ProcessPaymentCommand) -> Self {
        let pi = &cmd.payment_instrument;
        Self {
            merchant_customer_id: cmd.user_id.clone(),
            first_name: pi.first_name.clone(),
            last_name: pi.last_name.clone(),
            email: pi.email.clone(),
            phone_number: pi.phone_number.clone(),
            address1: pi.address1.clone(),
            address2: pi.address2.clone(),
            locality: pi.city.clone(),
            administrative_area: pi.state.clone(),
            postal_code: pi.postal_code.clone(),
            country: pi.country.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTokenInfo {
    pub transient_token: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerProfileResponse {
    pub customer_id: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardSummary {
    #[serde(default, rename = "type")]
    pub card_type: Option<String>,
    #[serde(default)]
    pub expiration_month: Option<String>,
    #[serde(default)]
    pub expiration_year: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInstrument {
    pub id: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub card: Option<CardSummary>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentInstrumentList {
    pub instruments: Vec<PaymentInstrument>,
}

/// Result of a charge or refund. `transaction_id` is always present when `is_success` is true.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionReceipt {
    pub transaction_id: Option<String>,
    pub is_success: bool,
    pub status: String,
    pub error_code: Option<String>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionRequest {
    pub plan_id: String,
    pub name: String,
    pub cybersource_customer_id: String,
    pub start_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionResponse {
    pub id: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RefundRequest {
    pub transaction_id: String,
    pub amount: Decimal,
    pub reference_id: String,
}

#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync {
    fn name(&self) -> &'static str;

    async fn create_customer_profile(
        &self,
        profile: &CustomerProfile,
        token: &PaymentTokenInfo,
    ) -> Result<CustomerProfileResponse>;

    async fn get_customer_payment_instruments(&self, customer_id: &str) -> Result<PaymentInstrumentList>;

    async fn process_payment(
        &self,
        reference_code: &str,
        instrument_id: &str,
        amount: Decimal,
        currency: &str,
    ) -> Result<TransactionReceipt>;

    async fn create_subscription(&self, request: &SubscriptionRequest) -> Result<SubscriptionResponse>;

    async fn generate_public_key(&self) -> Result<String>;

    async fn process_refund(&self, request: &RefundRequest) -> Result<TransactionReceipt>;
}

/// Picks the backend named by `PAYMENT_GATEWAY`. `None` means the integration is not configured.
pub fn build_gateway(cfg: &AppConfig) -> Option<Arc<dyn PaymentGateway>> {
    match cfg.gateway_backend {
        GatewayBackend::Mock => {
            tracing::warn!("using in-memory mock payment gateway");
            Some(Arc::new(mock::MockGateway::new()))
        }
        GatewayBackend::Cybersource if cfg.has_cybersource_credentials() => {
            Some(Arc::new(cybersource::CybersourceGateway {
                base_url: cfg.cybersource_base_url.trim_end_matches('/').to_string(),
                merchant_id: cfg.cybersource_merchant_id.clone(),
                key_id: cfg.cybersource_key_id.clone(),
                secret_key: cfg.cybersource_secret_key.clone(),
                timeout_ms: cfg.gateway_timeout_ms,
                client: reqwest::Client::new(),
            }))
        }
        GatewayBackend::Cybersource => {
            tracing::error!("PAYMENT_GATEWAY=cybersource but merchant credentials are missing");
            None
        }
        GatewayBackend::Unconfigured => {
            tracing::warn!("PAYMENT_GATEWAY not set; payments are disabled");
            None
        }
    }
}
