use crate::gateways::signing::{self, SigningKey};
use crate::gateways::wire::{
    ChargeBody, CreateCustomerBody, CreateSubscriptionBody, CustomerCreatedBody, IdRef,
    PaymentInstrumentsBody, PublicKeyBody, ReceiptBody, RefundBody, SubscriptionBody,
    SubscriptionCreatedBody, SubscriptionCustomer, SubscriptionInformation,
};
use crate::gateways::{
    CustomerProfile, CustomerProfileResponse, PaymentGateway, PaymentInstrumentList,
    PaymentTokenInfo, RefundRequest, SubscriptionRequest, SubscriptionResponse, TransactionReceipt,
};
use anyhow::{anyhow, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use rust_decimal::Decimal;
use serde::Serialize;

/// Signed REST client for the payment provider.
pub struct CybersourceGateway {
    pub base_url: String,
    pub merchant_id: String,
    pub key_id: String,
    pub secret_key: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

impl CybersourceGateway {
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response> {
        let url = reqwest::Url::parse(&format!("{}{}", self.base_url, path))?;
        let host = match (url.host_str(), url.port()) {
            (Some(h), Some(p)) => format!("{h}:{p}"),
            (Some(h), None) => h.to_string(),
            (None, _) => return Err(anyhow!("gateway base url {} has no host", self.base_url)),
        };
        let payload = body.map(serde_json::to_vec).transpose()?;

        let signed = signing::sign(
            &SigningKey {
                merchant_id: &self.merchant_id,
                key_id: &self.key_id,
                secret_key: &self.secret_key,
            },
            method.as_str(),
            &host,
            path,
            payload.as_deref(),
            &signing::http_date(chrono::Utc::now()),
        )?;

        let mut req = self
            .client
            .request(method, url)
            .header("v-c-merchant-id", &self.merchant_id)
            .header("date", &signed.date)
            .header("signature", &signed.signature)
            .timeout(std::time::Duration::from_millis(self.timeout_ms));
        if let Some(digest) = &signed.digest {
            req = req.header("digest", digest);
        }
        if let Some(bytes) = payload {
            req = req.header(CONTENT_TYPE, "application/json").body(bytes);
        }

        Ok(req.send().await?)
    }

    async fn read_receipt(&self, resp: reqwest::Response, op: &str) -> Result<TransactionReceipt> {
        let status = resp.status();
        if status.is_success() {
            let body: ReceiptBody = resp.json().await?;
            return body.into_receipt();
        }
        if status.is_client_error() {
            let body: ReceiptBody = resp.json().await.unwrap_or_default();
            tracing::warn!(
                "{} declined by gateway: HTTP {} {:?}",
                op,
                status.as_u16(),
                body.error_code
            );
            return Ok(body.into_declined(status.as_u16()));
        }
        Err(http_error(resp, op).await)
    }
}

async fn http_error(resp: reqwest::Response, op: &str) -> anyhow::Error {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    anyhow!(
        "{} returned HTTP {}: {}",
        op,
        status.as_u16(),
        body.chars().take(200).collect::<String>()
    )
}

#[async_trait::async_trait]
impl PaymentGateway for CybersourceGateway {
    fn name(&self) -> &'static str {
        "cybersource"
    }

    async fn create_customer_profile(
        &self,
        profile: &CustomerProfile,
        token: &PaymentTokenInfo,
    ) -> Result<CustomerProfileResponse> {
        let body = CreateCustomerBody {
            customer_profile: profile.clone(),
            payment_token_info: token.clone(),
        };
        let resp = self.send(Method::POST, "/pts/v2/customers", Some(&body)).await?;
        if !resp.status().is_success() {
            return Err(http_error(resp, "create customer profile").await);
        }
        let created: CustomerCreatedBody = resp.json().await?;
        created.into_response()
    }

    async fn get_customer_payment_instruments(&self, customer_id: &str) -> Result<PaymentInstrumentList> {
        let path = format!("/tms/v2/customers/{customer_id}/payment-instruments");
        let resp = self.send::<()>(Method::GET, &path, None).await?;
        if !resp.status().is_success() {
            return Err(http_error(resp, "list payment instruments").await);
        }
        let body: PaymentInstrumentsBody = resp.json().await?;
        Ok(body.into_list())
    }

    async fn process_payment(
        &self,
        reference_code: &str,
        instrument_id: &str,
        amount: Decimal,
        currency: &str,
    ) -> Result<TransactionReceipt> {
        let body = ChargeBody {
            client_reference_code: reference_code.to_string(),
            payment_instrument_id: instrument_id.to_string(),
            amount,
            currency: currency.to_string(),
        };
        let resp = self.send(Method::POST, "/pts/v2/payments", Some(&body)).await?;
        self.read_receipt(resp, "charge").await
    }

    async fn create_subscription(&self, request: &SubscriptionRequest) -> Result<SubscriptionResponse> {
        let body = CreateSubscriptionBody {
            subscription: SubscriptionBody {
                subscription_information: SubscriptionInformation {
                    plan_id: request.plan_id.clone(),
                    name: request.name.clone(),
                    start_date: request.start_date,
                },
                payment_information: SubscriptionCustomer {
                    customer: IdRef {
                        id: request.cybersource_customer_id.clone(),
                    },
                },
            },
        };
        let resp = self.send(Method::POST, "/rbs/v1/subscriptions", Some(&body)).await?;
        if !resp.status().is_success() {
            return Err(http_error(resp, "create subscription").await);
        }
        let created: SubscriptionCreatedBody = resp.json().await?;
        created.into_response()
    }

    async fn generate_public_key(&self) -> Result<String> {
        let resp = self.send::<()>(Method::GET, "/pts/v2/public-key", None).await?;
        if !resp.status().is_success() {
            return Err(http_error(resp, "generate public key").await);
        }
        let body: PublicKeyBody = resp.json().await?;
        body.public_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| anyhow!("public key response has no publicKey"))
    }

    async fn process_refund(&self, request: &RefundRequest) -> Result<TransactionReceipt> {
        let body = RefundBody {
            transaction_id: request.transaction_id.clone(),
            amount: request.amount,
            reference_id: request.reference_id.clone(),
        };
        let resp = self.send(Method::POST, "/pts/v2/refunds", Some(&body)).await?;
        self.read_receipt(resp, "refund").await
    }
}
