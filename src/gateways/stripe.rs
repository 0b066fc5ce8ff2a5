use crate::domain::checkout::CheckoutRequest;
use crate::gateways::{CheckoutGateway, CheckoutSession};
use anyhow::{bail, Context, Result};
use serde::Deserialize;

pub struct StripeGateway {
    pub base_url: String,
    pub secret_key: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct StripeSession {
    id: String,
    url: Option<String>,
}

pub fn session_params(request: &CheckoutRequest) -> Vec<(String, String)> {
    let item = request.line_item();
    vec![
        ("mode".to_string(), "payment".to_string()),
        ("success_url".to_string(), request.success_url.clone()),
        ("cancel_url".to_string(), request.cancel_url.clone()),
        (
            "line_items[0][price_data][currency]".to_string(),
            item.currency.to_lowercase(),
        ),
        (
            "line_items[0][price_data][product_data][name]".to_string(),
            item.name.clone(),
        ),
        (
            "line_items[0][price_data][unit_amount]".to_string(),
            item.unit_amount_minor.to_string(),
        ),
        ("line_items[0][quantity]".to_string(), item.quantity.to_string()),
        ("metadata[trip_name]".to_string(), item.name),
    ]
}

#[async_trait::async_trait]
impl CheckoutGateway for StripeGateway {
    fn name(&self) -> &'static str {
        "stripe"
    }

    async fn create_checkout(&self, request: &CheckoutRequest) -> Result<CheckoutSession> {
        let url = format!("{}/v1/checkout/sessions", self.base_url);
        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.secret_key)
            .form(&session_params(request))
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await
            .context("stripe checkout request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!(
                "stripe returned HTTP {}: {}",
                status.as_u16(),
                body.chars().take(200).collect::<String>()
            );
        }

        let session: StripeSession = resp
            .json()
            .await
            .context("stripe checkout response was not a session")?;

        Ok(CheckoutSession {
            provider: self.name().to_string(),
            id: session.id,
            url: session.url,
        })
    }
}
