use crate::domain::payment::ProcessPaymentCommand;
use crate::domain::response::err;
use crate::error::PaymentError;
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

pub async fn create_payment(
    State(state): State<AppState>,
    Json(cmd): Json<ProcessPaymentCommand>,
) -> Response {
    if let Err(reason) = cmd.validate() {
        return (StatusCode::BAD_REQUEST, Json(err("INVALID_COMMAND", &reason))).into_response();
    }

    match state.payment_service.process_payment(&cmd).await {
        Ok(resp) => (StatusCode::OK, Json(resp)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn public_key(State(state): State<AppState>) -> Response {
    match state.payment_service.public_key().await {
        Ok(key) => (StatusCode::OK, Json(serde_json::json!({ "publicKey": key }))).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub fn error_response(e: PaymentError) -> Response {
    let status = match &e {
        PaymentError::DataSourceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        PaymentError::Gateway { .. } => StatusCode::BAD_GATEWAY,
        PaymentError::TimedOut(_) => StatusCode::GATEWAY_TIMEOUT,
        PaymentError::Lookup { .. } | PaymentError::Unreconciled { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    if status.is_server_error() {
        tracing::error!("payment request failed: {}", e);
    }
    (status, Json(err(e.code(), &e.to_string()))).into_response()
}
