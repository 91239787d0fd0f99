use crate::domain::account_plan::AccountPlan;
use crate::domain::user::PersonalUser;
use anyhow::Result;

/// Mutation applied to a freshly loaded user inside the billing transaction.
pub type BillingMutation = Box<dyn FnOnce(&mut PersonalUser) -> Result<()> + Send>;

#[async_trait::async_trait]
pub trait UserLookup: Send + Sync {
    async fn get_by_id(&self, user_id: &str) -> Result<Option<PersonalUser>>;
}

#[async_trait::async_trait]
pub trait AccountPlanLookup: Send + Sync {
    async fn find_by_name(&self, name: &str) -> Result<Option<AccountPlan>>;
}

/// Load-mutate-save of one user, atomically. If the mutation or the save fails
/// nothing is persisted.
#[async_trait::async_trait]
pub trait BillingUnitOfWork: Send + Sync {
    async fn with_scoped_transaction(&self, user_id: &str, mutation: BillingMutation) -> Result<PersonalUser>;
}
