use std::time::Duration;

/// Failures that escape the payment saga as errors rather than as a `FAILED` response.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Payment data source is not available")]
    DataSourceUnavailable,

    #[error("{step} lookup failed: {error:#}")]
    Lookup {
        step: &'static str,
        error: anyhow::Error,
    },

    #[error("gateway call {step} failed: {error:#}")]
    Gateway {
        step: &'static str,
        error: anyhow::Error,
    },

    #[error(
        "billing update failed after charge {transaction_id} and subscription {subscription_id} for customer {customer_id}: {error:#}"
    )]
    Unreconciled {
        transaction_id: String,
        subscription_id: String,
        customer_id: String,
        error: anyhow::Error,
    },

    #[error("payment command exceeded its {0:?} deadline")]
    TimedOut(Duration),
}

impl PaymentError {
    pub fn code(&self) -> &'static str {
        match self {
            PaymentError::DataSourceUnavailable => "PAYMENT_DATA_SOURCE_UNAVAILABLE",
            PaymentError::Lookup { .. } => "LOOKUP_FAILED",
            PaymentError::Gateway { .. } => "GATEWAY_ERROR",
            PaymentError::Unreconciled { .. } => "BILLING_UNRECONCILED",
            PaymentError::TimedOut(_) => "COMMAND_TIMEOUT",
        }
    }
}
