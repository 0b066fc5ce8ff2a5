use crate::error::PaymentError;
use crate::gateways::CheckoutSession;
use crate::service::payment_service::{CaptureOutcome, CheckoutProvider};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::Value;

pub async fn create_stripe_checkout(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CheckoutSession>, PaymentError> {
    let Json(body) = payload?;
    let session = state
        .payment_service
        .create_checkout_session(CheckoutProvider::Stripe, &body)
        .await?;
    Ok(Json(session))
}

pub async fn create_paypal_checkout(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CheckoutSession>, PaymentError> {
    let Json(body) = payload?;
    let session = state
        .payment_service
        .create_checkout_session(CheckoutProvider::PayPal, &body)
        .await?;
    Ok(Json(session))
}

pub async fn capture_paypal_payment(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CaptureOutcome>, PaymentError> {
    let Json(body) = payload?;
    let outcome = state.payment_service.capture_paypal_payment(&body).await?;
    Ok(Json(outcome))
}

pub async fn check_order_status(
    State(state): State<AppState>,
    Path(trip_name): Path<String>,
) -> impl IntoResponse {
    match state.payment_service.order_status_for_trip(&trip_name).await {
        Ok(resp) => (axum::http::StatusCode::OK, Json(resp)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn health() -> impl IntoResponse {
    (axum::http::StatusCode::OK, "ok")
}
