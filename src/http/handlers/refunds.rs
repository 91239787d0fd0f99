use crate::domain::response::err;
use crate::gateways::wire::ReceiptBody;
use crate::gateways::RefundRequest;
use crate::http::handlers::payments::error_response;
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;

pub async fn create_refund(State(state): State<AppState>, Json(req): Json<RefundRequest>) -> Response {
    if req.transaction_id.trim().is_empty() || req.amount <= Decimal::ZERO {
        return (
            StatusCode::BAD_REQUEST,
            Json(err("INVALID_REFUND", "transactionId and a positive amount are required")),
        )
            .into_response();
    }

    match state.refund_service.refund(&req).await {
        Ok(receipt) => {
            let status = if receipt.is_success {
                StatusCode::OK
            } else {
                StatusCode::PAYMENT_REQUIRED
            };
            (status, Json(ReceiptBody::from_receipt(&receipt))).into_response()
        }
        Err(e) => error_response(e),
    }
}
