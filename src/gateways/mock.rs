use crate::gateways::wire::LIMIT_EXCEEDED;
use crate::gateways::{
    CardSummary, CustomerProfile, CustomerProfileResponse, PaymentGateway, PaymentInstrument,
    PaymentInstrumentList, PaymentTokenInfo, RefundRequest, SubscriptionRequest,
    SubscriptionResponse, TransactionReceipt,
};
use anyhow::{anyhow, Result};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Charges and refunds strictly above this amount are declined.
pub const DECLINE_THRESHOLD: Decimal = Decimal::ONE_THOUSAND;

pub const MOCK_PUBLIC_KEY: &str = "mock-public-key-0001";

/// Deterministic in-memory stand-in for the payment provider.
#[derive(Default)]
pub struct MockGateway {
    customers: RwLock<HashMap<String, Vec<PaymentInstrument>>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_declined(amount: Decimal) -> bool {
        amount > DECLINE_THRESHOLD
    }

    fn settle(amount: Decimal, ok_status: &str) -> TransactionReceipt {
        if Self::is_declined(amount) {
            return TransactionReceipt {
                transaction_id: None,
                is_success: false,
                status: "DECLINED".to_string(),
                error_code: Some(LIMIT_EXCEEDED.to_string()),
                completed_at: chrono::Utc::now(),
            };
        }
        TransactionReceipt {
            transaction_id: Some(format!("mock_txn_{}", uuid::Uuid::new_v4().simple())),
            is_success: true,
            status: ok_status.to_string(),
            error_code: None,
            completed_at: chrono::Utc::now(),
        }
    }
}

#[async_trait::async_trait]
impl PaymentGateway for MockGateway {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn create_customer_profile(
        &self,
        _profile: &CustomerProfile,
        token: &PaymentTokenInfo,
    ) -> Result<CustomerProfileResponse> {
        let customer_id = format!("mock_cust_{}", uuid::Uuid::new_v4().simple());
        let mut instruments = Vec::new();
        if !token.transient_token.trim().is_empty() {
            instruments.push(PaymentInstrument {
                id: format!("mock_pi_{}", uuid::Uuid::new_v4().simple()),
                state: Some("ACTIVE".to_string()),
                card: Some(CardSummary {
                    card_type: Some("001".to_string()),
                    expiration_month: Some("12".to_string()),
                    expiration_year: Some("2031".to_string()),
                }),
            });
        }
        self.customers
            .write()
            .await
            .insert(customer_id.clone(), instruments);

        Ok(CustomerProfileResponse {
            customer_id,
            status: "AUTHORIZED".to_string(),
        })
    }

    async fn get_customer_payment_instruments(&self, customer_id: &str) -> Result<PaymentInstrumentList> {
        let customers = self.customers.read().await;
        let instruments = customers
            .get(customer_id)
            .ok_or_else(|| anyhow!("customer {customer_id} not found"))?;
        Ok(PaymentInstrumentList {
            instruments: instruments.clone(),
        })
    }

    async fn process_payment(
        &self,
        _reference_code: &str,
        _instrument_id: &str,
        amount: Decimal,
        _currency: &str,
    ) -> Result<TransactionReceipt> {
        Ok(Self::settle(amount, "AUTHORIZED"))
    }

    async fn create_subscription(&self, request: &SubscriptionRequest) -> Result<SubscriptionResponse> {
        if !self
            .customers
            .read()
            .await
            .contains_key(&request.cybersource_customer_id)
        {
            return Err(anyhow!("customer {} not found", request.cybersource_customer_id));
        }
        Ok(SubscriptionResponse {
            id: format!("mock_sub_{}", uuid::Uuid::new_v4().simple()),
            status: "ACTIVE".to_string(),
        })
    }

    async fn generate_public_key(&self) -> Result<String> {
        Ok(MOCK_PUBLIC_KEY.to_string())
    }

    async fn process_refund(&self, request: &RefundRequest) -> Result<TransactionReceipt> {
        Ok(Self::settle(request.amount, "REFUNDED"))
    }
}
