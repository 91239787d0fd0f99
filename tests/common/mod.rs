#![allow(dead_code)]

use anyhow::{anyhow, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use subscription_payments::domain::account_plan::AccountPlan;
use subscription_payments::domain::payment::{BillingInstrument, ProcessPaymentCommand};
use subscription_payments::domain::user::PersonalUser;
use subscription_payments::gateways::{
    CustomerProfile, CustomerProfileResponse, PaymentGateway, PaymentInstrument,
    PaymentInstrumentList, PaymentTokenInfo, RefundRequest, SubscriptionRequest,
    SubscriptionResponse, TransactionReceipt,
};
use subscription_payments::repo::in_memory::{InMemoryPlanStore, InMemoryUserStore};
use subscription_payments::repo::ports::{AccountPlanLookup, BillingMutation, BillingUnitOfWork};
use subscription_payments::service::payment_service::PaymentService;

pub const USER_ID: &str = "user-123";
pub const PLAN_NAME: &str = "PREMIUM";
pub const PLAN_ID: &str = "cyb-plan-123";

pub fn command(amount: Decimal) -> ProcessPaymentCommand {
    ProcessPaymentCommand {
        user_id: USER_ID.to_string(),
        payment_amount: amount,
        currency: "USD".to_string(),
        payment_instrument: BillingInstrument {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            address1: "123 Main St".to_string(),
            address2: None,
            city: "New York".to_string(),
            state: "NY".to_string(),
            postal_code: "10001".to_string(),
            country: "US".to_string(),
            email: "john.doe@example.com".to_string(),
            phone_number: Some("555-0100".to_string()),
            payment_token: "tkn_visa_4242".to_string(),
        },
    }
}

pub fn premium_plan() -> AccountPlan {
    AccountPlan {
        name: PLAN_NAME.to_string(),
        cybersource_plan_id: PLAN_ID.to_string(),
        price: dec!(9.99),
        currency: "USD".to_string(),
        billing_period: "MONTHLY".to_string(),
    }
}

pub async fn seeded_users() -> InMemoryUserStore {
    let users = InMemoryUserStore::new();
    users
        .insert(PersonalUser::new(USER_ID, "john.doe@example.com", PLAN_NAME))
        .await;
    users
}

pub async fn seeded_plans() -> InMemoryPlanStore {
    let plans = InMemoryPlanStore::new();
    plans.insert(premium_plan()).await;
    plans
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChargeScript {
    Approve,
    Decline,
    Explode,
}

/// Gateway fake with fixed ids that records every call in order.
pub struct ScriptedGateway {
    pub calls: Mutex<Vec<String>>,
    pub customer_id: String,
    pub instruments: Vec<PaymentInstrument>,
    pub charge: ChargeScript,
    pub transaction_id: String,
    pub subscription_id: String,
    pub fail_customer_profile: bool,
    pub fail_instruments: bool,
    pub fail_subscription: bool,
    pub charge_delay: Option<Duration>,
    pub last_charge: Mutex<Option<(String, String, Decimal, String)>>,
    pub last_subscription: Mutex<Option<SubscriptionRequest>>,
}

impl ScriptedGateway {
    pub fn happy() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            customer_id: "cyb-cust-123".to_string(),
            instruments: vec![PaymentInstrument {
                id: "pi-123".to_string(),
                state: Some("ACTIVE".to_string()),
                card: None,
            }],
            charge: ChargeScript::Approve,
            transaction_id: "txn-123".to_string(),
            subscription_id: "sub-123".to_string(),
            fail_customer_profile: false,
            fail_instruments: false,
            fail_subscription: false,
            charge_delay: None,
            last_charge: Mutex::new(None),
            last_subscription: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == name).count()
    }

    fn record(&self, name: &str) {
        self.calls.lock().unwrap().push(name.to_string());
    }
}

#[async_trait::async_trait]
impl PaymentGateway for ScriptedGateway {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn create_customer_profile(
        &self,
        _profile: &CustomerProfile,
        _token: &PaymentTokenInfo,
    ) -> Result<CustomerProfileResponse> {
        self.record("create_customer_profile");
        if self.fail_customer_profile {
            return Err(anyhow!("connection reset by peer"));
        }
        Ok(CustomerProfileResponse {
            customer_id: self.customer_id.clone(),
            status: "AUTHORIZED".to_string(),
        })
    }

    async fn get_customer_payment_instruments(&self, _customer_id: &str) -> Result<PaymentInstrumentList> {
        self.record("get_customer_payment_instruments");
        if self.fail_instruments {
            return Err(anyhow!("instrument lookup timed out"));
        }
        Ok(PaymentInstrumentList {
            instruments: self.instruments.clone(),
        })
    }

    async fn process_payment(
        &self,
        reference_code: &str,
        instrument_id: &str,
        amount: Decimal,
        currency: &str,
    ) -> Result<TransactionReceipt> {
        self.record("process_payment");
        *self.last_charge.lock().unwrap() = Some((
            reference_code.to_string(),
            instrument_id.to_string(),
            amount,
            currency.to_string(),
        ));
        if let Some(delay) = self.charge_delay {
            tokio::time::sleep(delay).await;
        }
        match self.charge {
            ChargeScript::Approve => Ok(TransactionReceipt {
                transaction_id: Some(self.transaction_id.clone()),
                is_success: true,
                status: "AUTHORIZED".to_string(),
                error_code: None,
                completed_at: chrono::Utc::now(),
            }),
            ChargeScript::Decline => Ok(TransactionReceipt {
                transaction_id: Some("txn-declined".to_string()),
                is_success: false,
                status: "DECLINED".to_string(),
                error_code: Some("INSUFFICIENT_FUND".to_string()),
                completed_at: chrono::Utc::now(),
            }),
            ChargeScript::Explode => Err(anyhow!("gateway returned HTTP 503")),
        }
    }

    async fn create_subscription(&self, request: &SubscriptionRequest) -> Result<SubscriptionResponse> {
        self.record("create_subscription");
        *self.last_subscription.lock().unwrap() = Some(request.clone());
        if self.fail_subscription {
            return Err(anyhow!("subscription service unavailable"));
        }
        Ok(SubscriptionResponse {
            id: self.subscription_id.clone(),
            status: "ACTIVE".to_string(),
        })
    }

    async fn generate_public_key(&self) -> Result<String> {
        self.record("generate_public_key");
        Ok("scripted-key".to_string())
    }

    async fn process_refund(&self, _request: &RefundRequest) -> Result<TransactionReceipt> {
        self.record("process_refund");
        Err(anyhow!("refunds are not scripted"))
    }
}

pub struct CountingPlans {
    pub inner: InMemoryPlanStore,
    pub lookups: AtomicUsize,
}

#[async_trait::async_trait]
impl AccountPlanLookup for CountingPlans {
    async fn find_by_name(&self, name: &str) -> Result<Option<AccountPlan>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_name(name).await
    }
}

/// Delegates to the in-memory store, counting invocations; `fail` makes every transaction abort.
pub struct CountingUnitOfWork {
    pub inner: InMemoryUserStore,
    pub calls: AtomicUsize,
    pub fail: bool,
    pub delay: Option<Duration>,
}

#[async_trait::async_trait]
impl BillingUnitOfWork for CountingUnitOfWork {
    async fn with_scoped_transaction(&self, user_id: &str, mutation: BillingMutation) -> Result<PersonalUser> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(anyhow!("could not serialize access due to concurrent update"));
        }
        self.inner.with_scoped_transaction(user_id, mutation).await
    }
}

pub struct Harness {
    pub service: PaymentService,
    pub users: InMemoryUserStore,
    pub plans: Arc<CountingPlans>,
    pub billing: Arc<CountingUnitOfWork>,
}

impl Harness {
    pub async fn new(gateway: Option<Arc<dyn PaymentGateway>>) -> Self {
        Self::build(gateway, seeded_users().await, false).await
    }

    pub async fn build(
        gateway: Option<Arc<dyn PaymentGateway>>,
        users: InMemoryUserStore,
        fail_billing: bool,
    ) -> Self {
        Self::build_with_billing_delay(gateway, users, fail_billing, None).await
    }

    pub async fn build_with_billing_delay(
        gateway: Option<Arc<dyn PaymentGateway>>,
        users: InMemoryUserStore,
        fail_billing: bool,
        billing_delay: Option<Duration>,
    ) -> Self {
        let plans = Arc::new(CountingPlans {
            inner: seeded_plans().await,
            lookups: AtomicUsize::new(0),
        });
        let billing = Arc::new(CountingUnitOfWork {
            inner: users.clone(),
            calls: AtomicUsize::new(0),
            fail: fail_billing,
            delay: billing_delay,
        });
        let service = PaymentService {
            gateway,
            users: Arc::new(users.clone()),
            plans: plans.clone(),
            billing: billing.clone(),
            command_timeout: None,
        };
        Self {
            service,
            users,
            plans,
            billing,
        }
    }

    pub fn plan_lookups(&self) -> usize {
        self.plans.lookups.load(Ordering::SeqCst)
    }

    pub fn billing_calls(&self) -> usize {
        self.billing.calls.load(Ordering::SeqCst)
    }
}

pub fn as_gateway<G: PaymentGateway + 'static>(gw: &Arc<G>) -> Option<Arc<dyn PaymentGateway>> {
    let gateway: Arc<dyn PaymentGateway> = gw.clone();
    Some(gateway)
}
