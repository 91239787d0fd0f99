use serde::{Deserialize, Serialize};

pub const MSG_SUCCEEDED: &str = "Payment processed successfully";
pub const MSG_USER_NOT_FOUND: &str = "User not found";
pub const MSG_PLAN_NOT_FOUND: &str = "Account plan not found";
pub const MSG_NO_INSTRUMENT: &str = "No valid payment instrument found";
pub const MSG_CHARGE_FAILED: &str = "Payment processing failed";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentOutcome {
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub success: bool,
    pub status: PaymentOutcome,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cybersource_customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cybersource_subscription_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cybersource_plan_id: Option<String>,
}

impl PaymentResponse {
    pub fn failed(message: &str) -> Self {
        Self {
            success: false,
            status: PaymentOutcome::Failed,
            message: message.to_string(),
            id: None,
            cybersource_customer_id: None,
            cybersource_subscription_id: None,
            cybersource_plan_id: None,
        }
    }

    pub fn succeeded(
        transaction_id: String,
        customer_id: String,
        subscription_id: String,
        plan_id: String,
    ) -> Self {
        Self {
            success: true,
            status: PaymentOutcome::Succeeded,
            message: MSG_SUCCEEDED.to_string(),
            id: Some(transaction_id),
            cybersource_customer_id: Some(customer_id),
            cybersource_subscription_id: Some(subscription_id),
            cybersource_plan_id: Some(plan_id),
        }
    }
}

/// HTTP error body, shared by every handler.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorPayload,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

pub fn err(code: &str, message: &str) -> ErrorEnvelope {
    ErrorEnvelope {
        error: ErrorPayload {
            code: code.to_string(),
            message: message.to_string(),
            details: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_response_omits_gateway_ids() {
        let v = serde_json::to_value(PaymentResponse::failed(MSG_USER_NOT_FOUND)).unwrap();
        assert_eq!(
            v,
            serde_json::json!({"success": false, "status": "FAILED", "message": "User not found"})
        );
    }

    #[test]
    fn succeeded_response_uses_camel_case_ids() {
        let v = serde_json::to_value(PaymentResponse::succeeded(
            "t".to_string(),
            "c".to_string(),
            "s".to_string(),
            "p".to_string(),
        ))
        .unwrap();
        assert_eq!(v["status"], "SUCCEEDED");
        assert_eq!(v["cybersourceSubscriptionId"], "s");
        assert_eq!(v["cybersourcePlanId"], "p");
    }
}
