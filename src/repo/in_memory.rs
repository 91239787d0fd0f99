use crate::domain::account_plan::AccountPlan;
use crate::domain::user::PersonalUser;
use crate::repo::ports::{AccountPlanLookup, BillingMutation, BillingUnitOfWork, UserLookup};
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// User store for local runs and tests. The write lock is held for the whole
/// load-mutate-save, so billing updates are serialized per store.
#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<String, PersonalUser>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, user: PersonalUser) {
        self.users.write().await.insert(user.user_id.clone(), user);
    }

    pub async fn get(&self, user_id: &str) -> Option<PersonalUser> {
        self.users.read().await.get(user_id).cloned()
    }
}

#[async_trait::async_trait]
impl UserLookup for InMemoryUserStore {
    async fn get_by_id(&self, user_id: &str) -> Result<Option<PersonalUser>> {
        Ok(self.get(user_id).await)
    }
}

#[async_trait::async_trait]
impl BillingUnitOfWork for InMemoryUserStore {
    async fn with_scoped_transaction(&self, user_id: &str, mutation: BillingMutation) -> Result<PersonalUser> {
        let mut users = self.users.write().await;
        let mut working = users
            .get(user_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("user {user_id} not found inside billing transaction"))?;

        mutation(&mut working)?;
        users.insert(user_id.to_string(), working.clone());
        Ok(working)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryPlanStore {
    plans: Arc<RwLock<HashMap<String, AccountPlan>>>,
}

impl InMemoryPlanStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, plan: AccountPlan) {
        self.plans.write().await.insert(plan.name.clone(), plan);
    }
}

#[async_trait::async_trait]
impl AccountPlanLookup for InMemoryPlanStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<AccountPlan>> {
        Ok(self.plans.read().await.get(name).cloned())
    }
}
