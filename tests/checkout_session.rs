mod common;

use common::{payment_service, RecordingLedger};
use rust_decimal_macros::dec;
use serde_json::json;
use trip_payments::domain::checkout::CheckoutRequest;
use trip_payments::error::PaymentError;
use trip_payments::gateways::paypal::order_body;
use trip_payments::service::payment_service::CheckoutProvider;

fn body() -> serde_json::Value {
    json!({
        "tripName": "Mirissa Whale Watching",
        "amount": 2599,
        "quantity": 1,
        "successUrl": "https://trips.example.test/success",
        "cancelUrl": "https://trips.example.test/cancel",
        "currency": "USD"
    })
}

#[test]
fn cents_become_a_major_unit_line_item() {
    let req = CheckoutRequest::from_json(&body()).unwrap();
    let item = req.line_item();
    assert_eq!(item.unit_amount(), dec!(25.99));
    assert_eq!(item.currency, "USD");

    let order = order_body(&req).unwrap();
    let unit_amount = &order["purchase_units"][0]["items"][0]["unit_amount"];
    assert_eq!(unit_amount["value"], "25.99");
    assert_eq!(unit_amount["currency_code"], "USD");
}

#[tokio::test]
async fn session_creation_returns_processor_id_and_writes_nothing() {
    let ledger = RecordingLedger::default();
    let service = payment_service(&ledger, "ALWAYS_APPROVED");

    for provider in [CheckoutProvider::Stripe, CheckoutProvider::PayPal] {
        let session = service
            .create_checkout_session(provider, &body())
            .await
            .unwrap();
        assert!(session.id.starts_with("mock_cs_"));
        assert!(session
            .url
            .as_deref()
            .unwrap()
            .starts_with("https://trips.example.test/success"));
    }
    assert!(ledger.is_empty().await);
}

#[tokio::test]
async fn invalid_fields_are_rejected_before_reaching_the_processor() {
    let ledger = RecordingLedger::default();
    // Processor always fails here, so only validation errors can come back.
    let service = payment_service(&ledger, "ALWAYS_FAILURE");

    let mutations: Vec<(&str, serde_json::Value)> = vec![
        ("tripName", serde_json::Value::Null),
        ("amount", json!(0)),
        ("amount", json!(-100)),
        ("amount", json!("2599")),
        ("quantity", json!(1.5)),
        ("quantity", json!(0)),
        ("successUrl", json!("")),
        ("cancelUrl", json!(42)),
    ];

    for (field, value) in mutations {
        let mut b = body();
        b[field] = value.clone();
        let err = service
            .create_checkout_session(CheckoutProvider::Stripe, &b)
            .await
            .unwrap_err();
        assert!(
            matches!(err, PaymentError::InvalidInput(_)),
            "{field}={value} gave {err:?}"
        );
    }
}

#[tokio::test]
async fn processor_failure_surfaces_as_processor_error() {
    let ledger = RecordingLedger::default();
    let service = payment_service(&ledger, "ALWAYS_FAILURE");

    let err = service
        .create_checkout_session(CheckoutProvider::PayPal, &body())
        .await
        .unwrap_err();
    assert!(matches!(err, PaymentError::Processor(_)));
    assert_eq!(err.status_code(), axum::http::StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn oversized_total_is_rejected_before_reaching_the_processor() {
    let ledger = RecordingLedger::default();
    let service = payment_service(&ledger, "ALWAYS_FAILURE");

    let mut b = body();
    b["amount"] = json!(i64::MAX);
    b["quantity"] = json!(i64::MAX);

    for provider in [CheckoutProvider::Stripe, CheckoutProvider::PayPal] {
        let err = service
            .create_checkout_session(provider, &b)
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::InvalidInput(_)), "{err:?}");
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }
}
