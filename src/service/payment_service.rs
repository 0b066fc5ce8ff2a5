use crate::domain::checkout::{CaptureRequest, CheckoutRequest};
use crate::domain::payment::{
    OrderStatusResponse, PaymentRecordInput, PaymentStatus, PaymentType,
};
use crate::error::PaymentError;
use crate::gateways::{CheckoutGateway, CheckoutSession, GatewayOrder, OrderGateway};
use crate::repo::ledger::{InsertOutcome, PaymentLedger};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutProvider {
    Stripe,
    PayPal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureStatus {
    PaymentRecorded,
    AlreadyProcessed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureOutcome {
    pub status: CaptureStatus,
    pub order_id: String,
    pub payment_status: PaymentStatus,
}

#[derive(Clone)]
pub struct PaymentService {
    pub ledger: Arc<dyn PaymentLedger>,
    pub stripe: Arc<dyn CheckoutGateway>,
    pub paypal_checkout: Arc<dyn CheckoutGateway>,
    pub paypal_orders: Arc<dyn OrderGateway>,
}

impl PaymentService {
    pub async fn create_checkout_session(
        &self,
        provider: CheckoutProvider,
        body: &serde_json::Value,
    ) -> Result<CheckoutSession, PaymentError> {
        let request = CheckoutRequest::from_json(body)?;
        let gateway = match provider {
            CheckoutProvider::Stripe => &self.stripe,
            CheckoutProvider::PayPal => &self.paypal_checkout,
        };

        let session = gateway
            .create_checkout(&request)
            .await
            .map_err(PaymentError::Processor)?;

        tracing::info!(
            "created {} checkout {} for trip {}",
            gateway.name(),
            session.id,
            request.trip_name
        );
        Ok(session)
    }

    pub async fn capture_paypal_payment(
        &self,
        body: &serde_json::Value,
    ) -> Result<CaptureOutcome, PaymentError> {
        let request = CaptureRequest::from_json(body)?;

        let order = self
            .paypal_orders
            .get_order(&request.order_id)
            .await
            .map_err(PaymentError::Processor)?;
        ensure_same_order(&request.order_id, &order)?;

        let status = PaymentStatus::from_paypal_status(&order.status);
        if matches!(status, PaymentStatus::Approved | PaymentStatus::Completed) {
            if self
                .ledger
                .find_settled(&order.order_id, PaymentType::PayPal)
                .await
                .map_err(PaymentError::Persistence)?
                .is_some()
            {
                tracing::info!("paypal order {} already recorded", order.order_id);
                return Ok(already_processed(&order.order_id, status));
            }

            return self.persist(order, status).await;
        }

        tracing::info!(
            "paypal order {} is {}, requesting authorization",
            order.order_id,
            order.status
        );
        let authorized = self
            .paypal_orders
            .authorize_order(&order.order_id)
            .await
            .map_err(PaymentError::Processor)?;
        ensure_same_order(&request.order_id, &authorized)?;

        let status = PaymentStatus::from_paypal_status(
            authorized
                .authorization_status
                .as_deref()
                .unwrap_or(&authorized.status),
        );
        self.persist(authorized, status).await
    }

    async fn persist(
        &self,
        order: GatewayOrder,
        status: PaymentStatus,
    ) -> Result<CaptureOutcome, PaymentError> {
        let amount = order
            .amount
            .ok_or_else(|| PaymentError::IntegrationContract("amount is missing".to_string()))?;
        let currency = order
            .currency
            .ok_or_else(|| PaymentError::IntegrationContract("currency is missing".to_string()))?;
        let order_id = order.order_id;

        let input = PaymentRecordInput {
            payment_type: PaymentType::PayPal,
            order_id: order_id.clone(),
            transaction_id: order.transaction_id,
            amount,
            currency,
            status,
            checksum: None,
            trip_name: order.description,
            customer: order.payer,
        };

        match self
            .ledger
            .record(input)
            .await
            .map_err(PaymentError::Persistence)?
        {
            InsertOutcome::Inserted(record) => {
                tracing::info!(
                    "recorded paypal payment {} for order {} ({})",
                    record.id,
                    order_id,
                    status.as_str()
                );
                Ok(CaptureOutcome {
                    status: CaptureStatus::PaymentRecorded,
                    order_id,
                    payment_status: status,
                })
            }
            InsertOutcome::AlreadyRecorded => Ok(already_processed(&order_id, status)),
        }
    }

    pub async fn order_status_for_trip(
        &self,
        trip_name: &str,
    ) -> Result<OrderStatusResponse, PaymentError> {
        let latest = self
            .ledger
            .latest_for_trip(trip_name, PaymentType::PayPal)
            .await
            .map_err(PaymentError::Persistence)?;

        Ok(OrderStatusResponse {
            trip_name: trip_name.to_string(),
            status: latest
                .map(|r| r.status.as_str().to_string())
                .unwrap_or_else(|| "NOT_FOUND".to_string()),
        })
    }
}

fn ensure_same_order(requested: &str, order: &GatewayOrder) -> Result<(), PaymentError> {
    if order.order_id == requested {
        Ok(())
    } else {
        Err(PaymentError::IntegrationContract(format!(
            "asked for order {requested}, got {}",
            order.order_id
        )))
    }
}

fn already_processed(order_id: &str, status: PaymentStatus) -> CaptureOutcome {
    CaptureOutcome {
        status: CaptureStatus::AlreadyProcessed,
        order_id: order_id.to_string(),
        payment_status: status,
    }
}
