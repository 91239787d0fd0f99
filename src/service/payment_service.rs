use crate::domain::account_plan::AccountPlan;
use crate::domain::payment::ProcessPaymentCommand;
use crate::domain::response::{
    PaymentResponse, MSG_CHARGE_FAILED, MSG_NO_INSTRUMENT, MSG_PLAN_NOT_FOUND, MSG_USER_NOT_FOUND,
};
use crate::domain::user::{BillingTransaction, PersonalUser};
use crate::error::PaymentError;
use crate::gateways::{CustomerProfile, PaymentGateway, PaymentTokenInfo, SubscriptionRequest};
use crate::repo::ports::{AccountPlanLookup, BillingUnitOfWork, UserLookup};
use std::sync::Arc;
use std::time::Duration;

/// Upgrade saga: user and plan lookup, customer profile, instrument selection,
/// charge, subscription, then the billing update. Steps run strictly in order and
/// nothing after a failed step is attempted.
#[derive(Clone)]
pub struct PaymentService {
    pub gateway: Option<Arc<dyn PaymentGateway>>,
    pub users: Arc<dyn UserLookup>,
    pub plans: Arc<dyn AccountPlanLookup>,
    pub billing: Arc<dyn BillingUnitOfWork>,
    pub command_timeout: Option<Duration>,
}

impl PaymentService {
    /// Business failures come back as `Ok` with `success: false`. `Err` is reserved
    /// for a missing gateway integration and for infrastructure failures.
    ///
    /// The command deadline covers the steps up to and including the charge. Once a
    /// charge has succeeded, subscription and billing always run to completion.
    pub async fn process_payment(&self, cmd: &ProcessPaymentCommand) -> Result<PaymentResponse, PaymentError> {
        let gateway = self
            .gateway
            .as_deref()
            .ok_or(PaymentError::DataSourceUnavailable)?;

        let step = match self.command_timeout {
            Some(limit) => tokio::time::timeout(limit, self.charge(gateway, cmd))
                .await
                .map_err(|_| {
                    tracing::error!(
                        "payment for user {} abandoned after {:?} before the charge completed",
                        cmd.user_id,
                        limit
                    );
                    PaymentError::TimedOut(limit)
                })??,
            None => self.charge(gateway, cmd).await?,
        };

        match step {
            ChargeStep::Stopped(resp) => Ok(resp),
            ChargeStep::Charged(charged) => self.settle(gateway, charged).await,
        }
    }

    pub async fn public_key(&self) -> Result<String, PaymentError> {
        let gateway = self
            .gateway
            .as_deref()
            .ok_or(PaymentError::DataSourceUnavailable)?;
        gateway
            .generate_public_key()
            .await
            .map_err(gateway_err("generate_public_key"))
    }

    /// Steps 2-6: lookups, customer profile, instrument selection and the charge.
    async fn charge(&self, gateway: &dyn PaymentGateway, cmd: &ProcessPaymentCommand) -> Result<ChargeStep, PaymentError> {
        let user = self
            .users
            .get_by_id(&cmd.user_id)
            .await
            .map_err(|error| PaymentError::Lookup { step: "user", error })?;
        let Some(user) = user else {
            tracing::info!("payment rejected: user {} not found", cmd.user_id);
            return Ok(ChargeStep::Stopped(PaymentResponse::failed(MSG_USER_NOT_FOUND)));
        };

        let plan = self
            .plans
            .find_by_name(user.plan_name())
            .await
            .map_err(|error| PaymentError::Lookup {
                step: "account plan",
                error,
            })?;
        let Some(plan) = plan else {
            tracing::info!(
                "payment rejected: no account plan named {} for user {}",
                user.plan_name(),
                user.user_id
            );
            return Ok(ChargeStep::Stopped(PaymentResponse::failed(MSG_PLAN_NOT_FOUND)));
        };

        if let Some(existing) = &user.billing.cybersource_customer_id {
            tracing::debug!(
                "user {} already has customer {}; provisioning a new profile",
                user.user_id,
                existing
            );
        }
        let customer = gateway
            .create_customer_profile(
                &CustomerProfile::from_command(cmd),
                &PaymentTokenInfo {
                    transient_token: cmd.payment_instrument.payment_token.clone(),
                },
            )
            .await
            .map_err(gateway_err("create_customer_profile"))?;

        let instruments = gateway
            .get_customer_payment_instruments(&customer.customer_id)
            .await
            .map_err(gateway_err("get_customer_payment_instruments"))?;
        let Some(instrument) = instruments.instruments.first() else {
            tracing::info!(
                "payment rejected: customer {} has no payment instruments",
                customer.customer_id
            );
            return Ok(ChargeStep::Stopped(PaymentResponse::failed(MSG_NO_INSTRUMENT)));
        };

        let receipt = gateway
            .process_payment(
                &customer.customer_id,
                &instrument.id,
                cmd.payment_amount,
                &cmd.currency,
            )
            .await
            .map_err(gateway_err("process_payment"))?;
        let transaction_id = match receipt.transaction_id {
            Some(id) if receipt.is_success => id,
            _ => {
                tracing::warn!(
                    "charge of {} {} for user {} not successful: status={} error_code={:?}",
                    cmd.payment_amount,
                    cmd.currency,
                    user.user_id,
                    receipt.status,
                    receipt.error_code
                );
                return Ok(ChargeStep::Stopped(PaymentResponse::failed(MSG_CHARGE_FAILED)));
            }
        };

        Ok(ChargeStep::Charged(Charged {
            user,
            plan,
            customer_id: customer.customer_id,
            transaction_id,
        }))
    }

    /// Steps 7-9. Runs after money has moved, so it is never cut short by the deadline.
    async fn settle(&self, gateway: &dyn PaymentGateway, charged: Charged) -> Result<PaymentResponse, PaymentError> {
        let Charged {
            user,
            plan,
            customer_id,
            transaction_id,
        } = charged;
        let start_date = chrono::Utc::now();

        let subscription = gateway
            .create_subscription(&SubscriptionRequest {
                plan_id: plan.cybersource_plan_id.clone(),
                name: format!("{} plan for {}", plan.name, user.user_id),
                cybersource_customer_id: customer_id.clone(),
                start_date,
            })
            .await
            .map_err(|error| {
                tracing::error!(
                    "subscription creation failed after charge {} for user {}: {:#}",
                    transaction_id,
                    user.user_id,
                    error
                );
                PaymentError::Gateway {
                    step: "create_subscription",
                    error,
                }
            })?;

        let txn = BillingTransaction {
            cybersource_customer_id: customer_id.clone(),
            subscription_id: subscription.id.clone(),
            plan_code: plan.cybersource_plan_id.clone(),
            status: subscription.status.clone(),
            start_date,
        };
        self.billing
            .with_scoped_transaction(
                &user.user_id,
                Box::new(move |u: &mut PersonalUser| -> anyhow::Result<()> {
                    u.request_billing_transaction(txn)
                }),
            )
            .await
            .map_err(|error| {
                tracing::error!(
                    "billing update failed for user {}; charge {} and subscription {} are unreconciled: {:#}",
                    user.user_id,
                    transaction_id,
                    subscription.id,
                    error
                );
                PaymentError::Unreconciled {
                    transaction_id: transaction_id.clone(),
                    subscription_id: subscription.id.clone(),
                    customer_id: customer_id.clone(),
                    error,
                }
            })?;

        tracing::info!(
            "user {} upgraded to {}: transaction={} subscription={}",
            user.user_id,
            plan.name,
            transaction_id,
            subscription.id
        );

        Ok(PaymentResponse::succeeded(
            transaction_id,
            customer_id,
            subscription.id,
            plan.cybersource_plan_id,
        ))
    }
}

enum ChargeStep {
    Stopped(PaymentResponse),
    Charged(Charged),
}

struct Charged {
    user: PersonalUser,
    plan: AccountPlan,
    customer_id: String,
    transaction_id: String,
}

fn gateway_err(step: &'static str) -> impl FnOnce(anyhow::Error) -> PaymentError {
    move |error| PaymentError::Gateway { step, error }
}
