//! JSON bodies of the gateway REST surface. Shared by the HTTP adapter and the mock server.

use crate::gateways::{
    CustomerProfile, CustomerProfileResponse, PaymentInstrument, PaymentInstrumentList,
    PaymentTokenInfo, SubscriptionResponse, TransactionReceipt,
};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const LIMIT_EXCEEDED: &str = "LIMIT_EXCEEDED";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerBody {
    pub customer_profile: CustomerProfile,
    pub payment_token_info: PaymentTokenInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdRef {
    pub id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenInformation {
    #[serde(default)]
    pub customer: Option<IdRef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCreatedBody {
    #[serde(default)]
    pub token_information: Option<TokenInformation>,
    #[serde(default)]
    pub status: Option<String>,
}

impl CustomerCreatedBody {
    pub fn into_response(self) -> Result<CustomerProfileResponse> {
        let customer_id = self
            .token_information
            .and_then(|t| t.customer)
            .map(|c| c.id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| anyhow!("customer profile response has no tokenInformation.customer.id"))?;
        Ok(CustomerProfileResponse {
            customer_id,
            status: self.status.unwrap_or_else(|| "UNKNOWN".to_string()),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedInstruments {
    #[serde(default)]
    pub payment_instruments: Vec<PaymentInstrument>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentInstrumentsBody {
    #[serde(default, rename = "_embedded")]
    pub embedded: Option<EmbeddedInstruments>,
}

impl PaymentInstrumentsBody {
    pub fn into_list(self) -> PaymentInstrumentList {
        PaymentInstrumentList {
            instruments: self.embedded.map(|e| e.payment_instruments).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeBody {
    pub client_reference_code: String,
    pub payment_instrument_id: String,
    pub amount: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundBody {
    pub transaction_id: String,
    pub amount: Decimal,
    pub reference_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptBody {
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub is_success: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub submit_time_utc: Option<DateTime<Utc>>,
}

impl ReceiptBody {
    /// Receipt for a 2xx answer. `isSuccess` wins; otherwise it is derived from `status`.
    pub fn into_receipt(self) -> Result<TransactionReceipt> {
        let is_success = self
            .is_success
            .unwrap_or_else(|| matches!(self.status.as_deref(), Some("AUTHORIZED" | "SUCCEEDED" | "COMPLETED")));
        if is_success && self.transaction_id.as_deref().map_or(true, str::is_empty) {
            return Err(anyhow!("successful transaction response has no transactionId"));
        }
        Ok(TransactionReceipt {
            transaction_id: self.transaction_id,
            is_success,
            status: self
                .status
                .unwrap_or_else(|| if is_success { "SUCCEEDED" } else { "FAILED" }.to_string()),
            error_code: self.error_code,
            completed_at: self.submit_time_utc.unwrap_or_else(Utc::now),
        })
    }

    /// Receipt for a 4xx answer: always a decline, whatever the body claims.
    pub fn into_declined(self, http_status: u16) -> TransactionReceipt {
        TransactionReceipt {
            transaction_id: self.transaction_id,
            is_success: false,
            status: self.status.unwrap_or_else(|| "DECLINED".to_string()),
            error_code: self.error_code.or_else(|| Some(format!("HTTP_{http_status}"))),
            completed_at: self.submit_time_utc.unwrap_or_else(Utc::now),
        }
    }

    pub fn from_receipt(receipt: &TransactionReceipt) -> Self {
        Self {
            transaction_id: receipt.transaction_id.clone(),
            is_success: Some(receipt.is_success),
            status: Some(receipt.status.clone()),
            error_code: receipt.error_code.clone(),
            message: None,
            submit_time_utc: Some(receipt.completed_at),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionInformation {
    pub plan_id: String,
    pub name: String,
    pub start_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionCustomer {
    pub customer: IdRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionBody {
    pub subscription_information: SubscriptionInformation,
    pub payment_information: SubscriptionCustomer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubscriptionBody {
    pub subscription: SubscriptionBody,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscriptionCreatedBody {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl SubscriptionCreatedBody {
    pub fn into_response(self) -> Result<SubscriptionResponse> {
        let id = self
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| anyhow!("subscription response has no id"))?;
        Ok(SubscriptionResponse {
            id,
            status: self.status.unwrap_or_else(|| "UNKNOWN".to_string()),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyBody {
    #[serde(default)]
    pub public_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayErrorBody {
    pub error_code: String,
    pub message: String,
}
