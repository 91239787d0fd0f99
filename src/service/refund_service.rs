use crate::error::PaymentError;
use crate::gateways::{PaymentGateway, RefundRequest, TransactionReceipt};
use std::sync::Arc;

/// Manually triggered refunds. Never invoked by the upgrade saga.
#[derive(Clone)]
pub struct RefundService {
    pub gateway: Option<Arc<dyn PaymentGateway>>,
}

impl RefundService {
    pub async fn refund(&self, request: &RefundRequest) -> Result<TransactionReceipt, PaymentError> {
        let gateway = self
            .gateway
            .as_deref()
            .ok_or(PaymentError::DataSourceUnavailable)?;

        let receipt = gateway
            .process_refund(request)
            .await
            .map_err(|error| PaymentError::Gateway {
                step: "process_refund",
                error,
            })?;

        if receipt.is_success {
            tracing::info!(
                "refunded {} on transaction {} (reference {})",
                request.amount,
                request.transaction_id,
                request.reference_id
            );
        } else {
            tracing::warn!(
                "refund on transaction {} declined: {:?}",
                request.transaction_id,
                receipt.error_code
            );
        }
        Ok(receipt)
    }
}
