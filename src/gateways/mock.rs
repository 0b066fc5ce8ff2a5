use crate::domain::checkout::CheckoutRequest;
use crate::domain::payment::CustomerDetails;
use crate::gateways::{CheckoutGateway, CheckoutSession, GatewayOrder, OrderGateway};
use anyhow::{bail, Result};
use rust_decimal::Decimal;

// Unrecognised behaviors act like ALWAYS_APPROVED.
pub struct MockGateway {
    pub gateway_name: String,
    pub behavior: String,
}

impl MockGateway {
    fn order(&self, order_id: &str, status: &str) -> GatewayOrder {
        GatewayOrder {
            order_id: order_id.to_string(),
            status: status.to_string(),
            authorization_status: None,
            amount: Some(Decimal::new(2599, 2)),
            currency: Some("USD".to_string()),
            transaction_id: Some(format!("mock_txn_{}", uuid::Uuid::new_v4())),
            description: Some("Mock Trip".to_string()),
            payer: CustomerDetails {
                first_name: Some("Mock".to_string()),
                last_name: Some("Traveller".to_string()),
                email: Some("traveller@example.test".to_string()),
                ..Default::default()
            },
        }
    }
}

#[async_trait::async_trait]
impl CheckoutGateway for MockGateway {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn create_checkout(&self, request: &CheckoutRequest) -> Result<CheckoutSession> {
        if self.behavior == "ALWAYS_FAILURE" {
            bail!("mock processor declined checkout for {}", request.trip_name);
        }

        let id = format!("mock_cs_{}", uuid::Uuid::new_v4());
        Ok(CheckoutSession {
            provider: self.gateway_name.clone(),
            url: Some(format!("{}?session_id={}", request.success_url, id)),
            id,
        })
    }
}

#[async_trait::async_trait]
impl OrderGateway for MockGateway {
    async fn get_order(&self, order_id: &str) -> Result<GatewayOrder> {
        match self.behavior.as_str() {
            "ALWAYS_FAILURE" => bail!("mock processor unavailable"),
            "ALWAYS_COMPLETED" => Ok(self.order(order_id, "COMPLETED")),
            "REQUIRES_AUTHORIZATION" => Ok(self.order(order_id, "CREATED")),
            "MISMATCHED_ORDER_ID" => Ok(self.order(&format!("{order_id}-OTHER"), "COMPLETED")),
            "MISSING_AMOUNT" => {
                let mut order = self.order(order_id, "APPROVED");
                order.amount = None;
                order.currency = None;
                Ok(order)
            }
            _ => Ok(self.order(order_id, "APPROVED")),
        }
    }

    async fn authorize_order(&self, order_id: &str) -> Result<GatewayOrder> {
        if self.behavior == "ALWAYS_FAILURE" {
            bail!("mock processor unavailable");
        }

        let mut order = self.order(order_id, "COMPLETED");
        order.authorization_status = Some("CREATED".to_string());
        Ok(order)
    }
}
