use crate::domain::user::{Account, BillingProfile, PersonalUser, SubscriptionRecord};
use crate::repo::ports::UserLookup;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};

pub(crate) const USER_COLUMNS: &str = "user_id, email, account_type, cybersource_customer_id, subscription_id, subscription_plan_code, subscription_status, subscription_start_date, updated_at";

#[derive(Clone)]
pub struct UsersRepo {
    pub pool: PgPool,
}

pub(crate) fn user_from_row(r: &PgRow) -> PersonalUser {
    let updated_at: DateTime<Utc> = r.get("updated_at");
    let subscription = r
        .get::<Option<String>, _>("subscription_id")
        .map(|subscription_id| SubscriptionRecord {
            subscription_id,
            plan_code: r
                .get::<Option<String>, _>("subscription_plan_code")
                .unwrap_or_default(),
            status: r
                .get::<Option<String>, _>("subscription_status")
                .unwrap_or_default(),
            start_date: r
                .get::<Option<DateTime<Utc>>, _>("subscription_start_date")
                .unwrap_or(updated_at),
        });

    PersonalUser {
        user_id: r.get("user_id"),
        email: r.get("email"),
        account: Account {
            account_type: r.get("account_type"),
        },
        billing: BillingProfile {
            cybersource_customer_id: r.get("cybersource_customer_id"),
            subscription,
        },
        updated_at,
    }
}

impl UsersRepo {
    pub async fn save_billing_tx(tx: &mut Transaction<'_, Postgres>, user: &PersonalUser) -> anyhow::Result<()> {
        let sub = user.billing.subscription.as_ref();
        let result = sqlx::query(
            r#"
            UPDATE personal_users SET
                cybersource_customer_id = $2,
                subscription_id = $3,
                subscription_plan_code = $4,
                subscription_status = $5,
                subscription_start_date = $6,
                updated_at = $7
            WHERE user_id = $1
            "#,
        )
        .bind(&user.user_id)
        .bind(user.billing.cybersource_customer_id.clone())
        .bind(sub.map(|s| s.subscription_id.clone()))
        .bind(sub.map(|s| s.plan_code.clone()))
        .bind(sub.map(|s| s.status.clone()))
        .bind(sub.map(|s| s.start_date))
        .bind(user.updated_at)
        .execute(tx.as_mut())
        .await?;

        if result.rows_affected() != 1 {
            anyhow::bail!("billing update touched {} rows for user {}", result.rows_affected(), user.user_id);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl UserLookup for UsersRepo {
    async fn get_by_id(&self, user_id: &str) -> anyhow::Result<Option<PersonalUser>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM personal_users WHERE user_id = $1");
        let row = sqlx::query(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }
}
