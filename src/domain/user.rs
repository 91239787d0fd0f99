use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub account_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionRecord {
    pub subscription_id: String,
    pub plan_code: String,
    pub status: String,
    pub start_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BillingProfile {
    pub cybersource_customer_id: Option<String>,
    pub subscription: Option<SubscriptionRecord>,
}

/// Outcome of a paid upgrade, applied to the user inside the billing unit-of-work.
#[derive(Debug, Clone, PartialEq)]
pub struct BillingTransaction {
    pub cybersource_customer_id: String,
    pub subscription_id: String,
    pub plan_code: String,
    pub status: String,
    pub start_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonalUser {
    pub user_id: String,
    pub email: String,
    pub account: Account,
    pub billing: BillingProfile,
    pub updated_at: DateTime<Utc>,
}

impl PersonalUser {
    pub fn new(user_id: &str, email: &str, account_type: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            email: email.to_string(),
            account: Account {
                account_type: account_type.to_string(),
            },
            billing: BillingProfile::default(),
            updated_at: Utc::now(),
        }
    }

    pub fn plan_name(&self) -> &str {
        &self.account.account_type
    }

    /// Records the gateway customer and the newly activated subscription.
    /// A previous subscription, if any, is replaced.
    pub fn request_billing_transaction(&mut self, txn: BillingTransaction) -> anyhow::Result<()> {
        if txn.cybersource_customer_id.trim().is_empty() {
            anyhow::bail!("billing transaction for {} has no customer id", self.user_id);
        }
        if txn.subscription_id.trim().is_empty() {
            anyhow::bail!("billing transaction for {} has no subscription id", self.user_id);
        }

        self.billing.cybersource_customer_id = Some(txn.cybersource_customer_id);
        self.billing.subscription = Some(SubscriptionRecord {
            subscription_id: txn.subscription_id,
            plan_code: txn.plan_code,
            status: txn.status,
            start_date: txn.start_date,
        });
        self.updated_at = Utc::now();
        Ok(())
    }
}
