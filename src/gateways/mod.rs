use crate::domain::checkout::CheckoutRequest;
use crate::domain::payment::CustomerDetails;
use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;

pub mod mock;
pub mod payhere;
pub mod paypal;
pub mod stripe;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    pub provider: String,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GatewayOrder {
    pub order_id: String,
    pub status: String,
    pub authorization_status: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub transaction_id: Option<String>,
    pub description: Option<String>,
    pub payer: CustomerDetails,
}

#[async_trait::async_trait]
pub trait CheckoutGateway: Send + Sync {
    fn name(&self) -> &'static str;

    async fn create_checkout(&self, request: &CheckoutRequest) -> Result<CheckoutSession>;
}

#[async_trait::async_trait]
pub trait OrderGateway: Send + Sync {
    async fn get_order(&self, order_id: &str) -> Result<GatewayOrder>;

    async fn authorize_order(&self, order_id: &str) -> Result<GatewayOrder>;
}
