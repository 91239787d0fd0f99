//! HTTP front for [`MockGateway`], speaking the provider's REST surface.
//! Request signatures are accepted without verification.

use crate::gateways::mock::{MockGateway, DECLINE_THRESHOLD};
use crate::gateways::wire::{
    ChargeBody, CreateCustomerBody, CreateSubscriptionBody, CustomerCreatedBody, EmbeddedInstruments,
    GatewayErrorBody, IdRef, PaymentInstrumentsBody, PublicKeyBody, ReceiptBody, RefundBody,
    SubscriptionCreatedBody, TokenInformation, LIMIT_EXCEEDED,
};
use crate::gateways::{PaymentGateway, RefundRequest, SubscriptionRequest, TransactionReceipt};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use std::sync::Arc;

pub fn router(gateway: Arc<MockGateway>) -> Router {
    Router::new()
        .route("/pts/v2/customers", post(create_customer))
        .route(
            "/tms/v2/customers/:customer_id/payment-instruments",
            get(list_instruments),
        )
        .route("/pts/v2/payments", post(charge))
        .route("/pts/v2/refunds", post(refund))
        .route("/rbs/v1/subscriptions", post(create_subscription))
        .route("/pts/v2/public-key", get(public_key))
        .with_state(gateway)
}

fn error(status: StatusCode, code: &str, message: String) -> Response {
    (
        status,
        Json(GatewayErrorBody {
            error_code: code.to_string(),
            message,
        }),
    )
        .into_response()
}

fn settled(receipt: TransactionReceipt, amount: Decimal) -> Response {
    if receipt.is_success {
        return (StatusCode::CREATED, Json(ReceiptBody::from_receipt(&receipt))).into_response();
    }
    error(
        StatusCode::PAYMENT_REQUIRED,
        receipt.error_code.as_deref().unwrap_or(LIMIT_EXCEEDED),
        format!("amount {amount} exceeds the mock limit of {DECLINE_THRESHOLD}"),
    )
}

async fn create_customer(
    State(gateway): State<Arc<MockGateway>>,
    Json(body): Json<CreateCustomerBody>,
) -> Response {
    match gateway
        .create_customer_profile(&body.customer_profile, &body.payment_token_info)
        .await
    {
        Ok(created) => (
            StatusCode::CREATED,
            Json(CustomerCreatedBody {
                token_information: Some(TokenInformation {
                    customer: Some(IdRef {
                        id: created.customer_id,
                    }),
                }),
                status: Some(created.status),
            }),
        )
            .into_response(),
        Err(e) => error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", e.to_string()),
    }
}

async fn list_instruments(
    State(gateway): State<Arc<MockGateway>>,
    Path(customer_id): Path<String>,
) -> Response {
    match gateway.get_customer_payment_instruments(&customer_id).await {
        Ok(list) => Json(PaymentInstrumentsBody {
            embedded: Some(EmbeddedInstruments {
                payment_instruments: list.instruments,
            }),
        })
        .into_response(),
        Err(e) => error(StatusCode::NOT_FOUND, "NOT_FOUND", e.to_string()),
    }
}

async fn charge(State(gateway): State<Arc<MockGateway>>, Json(body): Json<ChargeBody>) -> Response {
    match gateway
        .process_payment(
            &body.client_reference_code,
            &body.payment_instrument_id,
            body.amount,
            &body.currency,
        )
        .await
    {
        Ok(receipt) => settled(receipt, body.amount),
        Err(e) => error(StatusCode::INTERNAL_SERVER_ERROR, "PROCESSING_ERROR", e.to_string()),
    }
}

async fn refund(State(gateway): State<Arc<MockGateway>>, Json(body): Json<RefundBody>) -> Response {
    let request = RefundRequest {
        transaction_id: body.transaction_id,
        amount: body.amount,
        reference_id: body.reference_id,
    };
    match gateway.process_refund(&request).await {
        Ok(receipt) => settled(receipt, request.amount),
        Err(e) => error(StatusCode::INTERNAL_SERVER_ERROR, "PROCESSING_ERROR", e.to_string()),
    }
}

async fn create_subscription(
    State(gateway): State<Arc<MockGateway>>,
    Json(body): Json<CreateSubscriptionBody>,
) -> Response {
    let info = body.subscription.subscription_information;
    let request = SubscriptionRequest {
        plan_id: info.plan_id,
        name: info.name,
        cybersource_customer_id: body.subscription.payment_information.customer.id,
        start_date: info.start_date,
    };
    match gateway.create_subscription(&request).await {
        Ok(created) => (
            StatusCode::CREATED,
            Json(SubscriptionCreatedBody {
                id: Some(created.id),
                status: Some(created.status),
            }),
        )
            .into_response(),
        Err(e) => error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", e.to_string()),
    }
}

async fn public_key(State(gateway): State<Arc<MockGateway>>) -> Response {
    match gateway.generate_public_key().await {
        Ok(key) => Json(PublicKeyBody {
            public_key: Some(key),
        })
        .into_response(),
        Err(e) => error(StatusCode::INTERNAL_SERVER_ERROR, "PROCESSING_ERROR", e.to_string()),
    }
}
