use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A named subscription tier. `name` matches `Account::account_type` on the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountPlan {
    pub name: String,
    pub cybersource_plan_id: String,
    pub price: Decimal,
    pub currency: String,
    pub billing_period: String,
}
