use crate::domain::account_plan::AccountPlan;
use crate::repo::ports::AccountPlanLookup;
use sqlx::{PgPool, Row};

#[derive(Clone)]
pub struct AccountPlansRepo {
    pub pool: PgPool,
}

#[async_trait::async_trait]
impl AccountPlanLookup for AccountPlansRepo {
    async fn find_by_name(&self, name: &str) -> anyhow::Result<Option<AccountPlan>> {
        let row = sqlx::query(
            "SELECT name, cybersource_plan_id, price, currency, billing_period FROM account_plans WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| AccountPlan {
            name: r.get("name"),
            cybersource_plan_id: r.get("cybersource_plan_id"),
            price: r.get("price"),
            currency: r.get("currency"),
            billing_period: r.get("billing_period"),
        }))
    }
}
