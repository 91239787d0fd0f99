mod common;

use common::{as_gateway, command, Harness};
use rust_decimal_macros::dec;
use std::sync::Arc;
use subscription_payments::gateways::mock::MockGateway;
use subscription_payments::gateways::wire::LIMIT_EXCEEDED;
use subscription_payments::gateways::{
    CustomerProfile, PaymentGateway, PaymentTokenInfo, RefundRequest, SubscriptionRequest,
};

fn token(value: &str) -> PaymentTokenInfo {
    PaymentTokenInfo {
        transient_token: value.to_string(),
    }
}

#[tokio::test]
async fn threshold_amount_is_approved_and_anything_above_is_declined() {
    let gw = MockGateway::new();

    let ok = gw.process_payment("ref", "pi", dec!(1000), "USD").await.unwrap();
    assert!(ok.is_success);
    assert!(ok.transaction_id.unwrap().starts_with("mock_txn_"));

    let declined = gw.process_payment("ref", "pi", dec!(1000.01), "USD").await.unwrap();
    assert!(!declined.is_success);
    assert!(declined.transaction_id.is_none());
    assert_eq!(declined.error_code.as_deref(), Some(LIMIT_EXCEEDED));
}

#[tokio::test]
async fn refunds_follow_the_same_limit() {
    let gw = MockGateway::new();

    let refunded = gw
        .process_refund(&RefundRequest {
            transaction_id: "mock_txn_1".to_string(),
            amount: dec!(25),
            reference_id: "r-1".to_string(),
        })
        .await
        .unwrap();
    assert!(refunded.is_success);
    assert_eq!(refunded.status, "REFUNDED");

    let declined = gw
        .process_refund(&RefundRequest {
            transaction_id: "mock_txn_1".to_string(),
            amount: dec!(1500),
            reference_id: "r-2".to_string(),
        })
        .await
        .unwrap();
    assert!(!declined.is_success);
    assert_eq!(declined.error_code.as_deref(), Some(LIMIT_EXCEEDED));
}

#[tokio::test]
async fn transaction_ids_are_unique() {
    let gw = MockGateway::new();
    let a = gw.process_payment("ref", "pi", dec!(5), "USD").await.unwrap();
    let b = gw.process_payment("ref", "pi", dec!(5), "USD").await.unwrap();
    assert_ne!(a.transaction_id, b.transaction_id);
}

#[tokio::test]
async fn customer_gets_one_instrument_per_token() {
    let gw = MockGateway::new();
    let profile = CustomerProfile::from_command(&command(dec!(9.99)));

    let with_token = gw.create_customer_profile(&profile, &token("tkn_1")).await.unwrap();
    let list = gw
        .get_customer_payment_instruments(&with_token.customer_id)
        .await
        .unwrap();
    assert_eq!(list.instruments.len(), 1);

    let without_token = gw.create_customer_profile(&profile, &token("  ")).await.unwrap();
    assert_ne!(with_token.customer_id, without_token.customer_id);
    let list = gw
        .get_customer_payment_instruments(&without_token.customer_id)
        .await
        .unwrap();
    assert!(list.instruments.is_empty());
}

#[tokio::test]
async fn unknown_customers_are_errors() {
    let gw = MockGateway::new();
    assert!(gw.get_customer_payment_instruments("nobody").await.is_err());
    assert!(gw
        .create_subscription(&SubscriptionRequest {
            plan_id: "plan".to_string(),
            name: "plan for nobody".to_string(),
            cybersource_customer_id: "nobody".to_string(),
            start_date: chrono::Utc::now(),
        })
        .await
        .is_err());
}

#[tokio::test]
async fn saga_over_mock_upgrades_user() {
    let gw = Arc::new(MockGateway::new());
    let h = Harness::new(as_gateway(&gw)).await;

    let resp = h.service.process_payment(&command(dec!(9.99))).await.unwrap();

    assert!(resp.success);
    assert!(resp.id.as_deref().unwrap().starts_with("mock_txn_"));
    assert!(resp
        .cybersource_subscription_id
        .as_deref()
        .unwrap()
        .starts_with("mock_sub_"));
    let stored = h.users.get(common::USER_ID).await.unwrap();
    assert_eq!(stored.billing.cybersource_customer_id, resp.cybersource_customer_id);
}

#[tokio::test]
async fn saga_over_mock_reports_decline_above_limit() {
    let gw = Arc::new(MockGateway::new());
    let h = Harness::new(as_gateway(&gw)).await;

    let resp = h.service.process_payment(&command(dec!(1500))).await.unwrap();

    assert!(!resp.success);
    assert_eq!(resp.message, "Payment processing failed");
    assert_eq!(h.billing_calls(), 0);
}

#[tokio::test]
async fn saga_over_mock_without_token_has_no_instrument() {
    let gw = Arc::new(MockGateway::new());
    let h = Harness::new(as_gateway(&gw)).await;
    let mut cmd = command(dec!(9.99));
    cmd.payment_instrument.payment_token = String::new();

    let resp = h.service.process_payment(&cmd).await.unwrap();

    assert_eq!(resp.message, "No valid payment instrument found");
}

#[tokio::test]
async fn repeated_mock_runs_produce_distinct_gateway_ids() {
    let gw = Arc::new(MockGateway::new());
    let h = Harness::new(as_gateway(&gw)).await;
    let cmd = command(dec!(9.99));

    let first = h.service.process_payment(&cmd).await.unwrap();
    let second = h.service.process_payment(&cmd).await.unwrap();

    assert_ne!(first.id, second.id);
    assert_ne!(first.cybersource_customer_id, second.cybersource_customer_id);
    assert_ne!(first.cybersource_subscription_id, second.cybersource_subscription_id);
}
