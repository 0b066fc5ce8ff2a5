use crate::domain::notification::{NotificationAck, PayHereInitiation, PayHereNotification};
use crate::error::PaymentError;
use crate::AppState;
use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::State;
use axum::{Form, Json};

pub async fn initiate_payhere(
    State(state): State<AppState>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<PayHereInitiation>, PaymentError> {
    let Json(body) = payload?;
    Ok(Json(state.payhere_service.initiate(&body)?))
}

// A 200 only acknowledges receipt; PayHere retries on anything else.
pub async fn notify_payhere(
    State(state): State<AppState>,
    payload: Result<Form<PayHereNotification>, FormRejection>,
) -> Result<Json<NotificationAck>, PaymentError> {
    let Form(notification) = payload?;
    let ack = state.payhere_service.handle_notification(&notification).await?;
    Ok(Json(ack))
}
