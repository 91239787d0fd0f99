use crate::domain::user::PersonalUser;
use crate::repo::ports::{BillingMutation, BillingUnitOfWork};
use crate::repo::users_repo::{user_from_row, UsersRepo, USER_COLUMNS};
use anyhow::Result;
use sqlx::PgPool;

#[derive(Clone)]
pub struct PgBillingUnitOfWork {
    pub pool: PgPool,
}

#[async_trait::async_trait]
impl BillingUnitOfWork for PgBillingUnitOfWork {
    async fn with_scoped_transaction(&self, user_id: &str, mutation: BillingMutation) -> Result<PersonalUser> {
        let mut tx = self.pool.begin().await?;

        let sql = format!("SELECT {USER_COLUMNS} FROM personal_users WHERE user_id = $1 FOR UPDATE");
        let row = sqlx::query(&sql)
            .bind(user_id)
            .fetch_optional(tx.as_mut())
            .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            anyhow::bail!("user {user_id} not found inside billing transaction");
        };

        let mut user = user_from_row(&row);
        if let Err(e) = mutation(&mut user) {
            return Err(rejected(user_id, e, tx.rollback().await));
        }

        UsersRepo::save_billing_tx(&mut tx, &user).await?;
        tx.commit().await?;
        Ok(user)
    }
}

/// The mutation's error is what the caller sees; a failed rollback is only logged.
fn rejected(user_id: &str, error: anyhow::Error, rollback: Result<(), sqlx::Error>) -> anyhow::Error {
    if let Err(e) = rollback {
        tracing::warn!("rollback of billing transaction for {} failed: {}", user_id, e);
    }
    error
}
