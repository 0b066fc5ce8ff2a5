use crate::domain::checkout::CheckoutRequest;
use crate::domain::payment::CustomerDetails;
use crate::gateways::{CheckoutGateway, CheckoutSession, GatewayOrder, OrderGateway};
use anyhow::{anyhow, bail, Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};

pub struct PayPalGateway {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct AccessToken {
    access_token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PayPalOrder {
    id: String,
    status: Option<String>,
    #[serde(default)]
    purchase_units: Vec<PurchaseUnit>,
    payer: Option<Payer>,
    #[serde(default)]
    links: Vec<Link>,
}

#[derive(Debug, Deserialize)]
struct PurchaseUnit {
    description: Option<String>,
    amount: Option<Money>,
    payments: Option<Payments>,
    shipping: Option<Shipping>,
}

#[derive(Debug, Deserialize)]
struct Money {
    currency_code: Option<String>,
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Payments {
    #[serde(default)]
    captures: Vec<PaymentRef>,
    #[serde(default)]
    authorizations: Vec<PaymentRef>,
}

#[derive(Debug, Deserialize)]
struct PaymentRef {
    id: Option<String>,
    status: Option<String>,
    amount: Option<Money>,
}

#[derive(Debug, Deserialize)]
struct Payer {
    name: Option<PayerName>,
    email_address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PayerName {
    given_name: Option<String>,
    surname: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Shipping {
    address: Option<Address>,
}

#[derive(Debug, Deserialize)]
struct Address {
    address_line_1: Option<String>,
    admin_area_2: Option<String>,
    country_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Link {
    href: String,
    rel: String,
}

pub fn order_body(request: &CheckoutRequest) -> Result<Value> {
    let item = request.line_item();
    let unit = item.format_amount(item.unit_amount());
    let total = item.format_amount(
        item.total_amount()
            .context("amount times quantity is too large")?,
    );

    Ok(json!({
        "intent": "CAPTURE",
        "purchase_units": [{
            "description": item.name,
            "amount": {
                "currency_code": item.currency,
                "value": total,
                "breakdown": {
                    "item_total": { "currency_code": item.currency, "value": total }
                }
            },
            "items": [{
                "name": item.name,
                "quantity": item.quantity.to_string(),
                "unit_amount": { "currency_code": item.currency, "value": unit }
            }]
        }],
        "application_context": {
            "return_url": request.success_url,
            "cancel_url": request.cancel_url
        }
    }))
}

/// `{base}/v2/checkout/orders/{id}[/{action}]` with the id percent-encoded as
/// one path segment.
pub fn order_url(base_url: &str, order_id: &str, action: Option<&str>) -> Result<reqwest::Url> {
    let mut url = reqwest::Url::parse(base_url).context("invalid paypal base url")?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| anyhow!("paypal base url cannot carry a path"))?;
        segments
            .pop_if_empty()
            .extend(["v2", "checkout", "orders", order_id]);
        if let Some(action) = action {
            segments.push(action);
        }
    }
    Ok(url)
}

impl PayPalOrder {
    pub(crate) fn approval_url(&self) -> Option<String> {
        self.links
            .iter()
            .find(|l| l.rel == "approve" || l.rel == "payer-action")
            .map(|l| l.href.clone())
    }

    pub(crate) fn normalize(self) -> GatewayOrder {
        let unit = self.purchase_units.into_iter().next();
        let (description, amount, payments, shipping) = match unit {
            Some(u) => (u.description, u.amount, u.payments, u.shipping),
            None => (None, None, None, None),
        };

        let capture = payments.as_ref().and_then(|p| p.captures.first());
        let authorization = payments.as_ref().and_then(|p| p.authorizations.first());
        let payment_ref = capture.or(authorization);

        let money = amount
            .as_ref()
            .or_else(|| payment_ref.and_then(|p| p.amount.as_ref()));
        let parsed_amount = money
            .and_then(|m| m.value.as_deref())
            .and_then(|v| v.parse::<Decimal>().ok());
        let currency = money.and_then(|m| m.currency_code.clone());

        let address = shipping.and_then(|s| s.address);
        let (name, email) = match self.payer {
            Some(p) => (p.name, p.email_address),
            None => (None, None),
        };
        let (first_name, last_name) = match name {
            Some(n) => (n.given_name, n.surname),
            None => (None, None),
        };

        GatewayOrder {
            order_id: self.id,
            status: self.status.unwrap_or_default(),
            authorization_status: authorization.and_then(|a| a.status.clone()),
            amount: parsed_amount,
            currency,
            transaction_id: payment_ref.and_then(|p| p.id.clone()),
            description,
            payer: CustomerDetails {
                first_name,
                last_name,
                email,
                phone: None,
                address: address.as_ref().and_then(|a| a.address_line_1.clone()),
                city: address.as_ref().and_then(|a| a.admin_area_2.clone()),
                country: address.as_ref().and_then(|a| a.country_code.clone()),
            },
        }
    }
}

impl PayPalGateway {
    fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms)
    }

    async fn access_token(&self) -> Result<String> {
        let resp = self
            .client
            .post(format!("{}/v1/oauth2/token", self.base_url))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .timeout(self.timeout())
            .send()
            .await
            .context("paypal token request failed")?;

        let status = resp.status();
        if !status.is_success() {
            bail!("paypal token endpoint returned HTTP {}", status.as_u16());
        }

        let token: AccessToken = resp.json().await.context("paypal token response malformed")?;
        Ok(token.access_token)
    }

    async fn send_order_request(&self, request: reqwest::RequestBuilder) -> Result<PayPalOrder> {
        let token = self.access_token().await?;
        let resp = request
            .bearer_auth(token)
            .timeout(self.timeout())
            .send()
            .await
            .context("paypal order request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!(
                "paypal returned HTTP {}: {}",
                status.as_u16(),
                body.chars().take(200).collect::<String>()
            );
        }

        resp.json::<PayPalOrder>()
            .await
            .context("paypal order response malformed")
    }
}

#[async_trait::async_trait]
impl CheckoutGateway for PayPalGateway {
    fn name(&self) -> &'static str {
        "paypal"
    }

    async fn create_checkout(&self, request: &CheckoutRequest) -> Result<CheckoutSession> {
        let req = self
            .client
            .post(format!("{}/v2/checkout/orders", self.base_url))
            .json(&order_body(request)?);
        let order = self.send_order_request(req).await?;

        Ok(CheckoutSession {
            provider: self.name().to_string(),
            url: order.approval_url(),
            id: order.id,
        })
    }
}

#[async_trait::async_trait]
impl OrderGateway for PayPalGateway {
    async fn get_order(&self, order_id: &str) -> Result<GatewayOrder> {
        let req = self.client.get(order_url(&self.base_url, order_id, None)?);
        Ok(self.send_order_request(req).await?.normalize())
    }

    async fn authorize_order(&self, order_id: &str) -> Result<GatewayOrder> {
        let req = self
            .client
            .post(order_url(&self.base_url, order_id, Some("authorize"))?)
            .header("Content-Type", "application/json")
            .body("{}");
        Ok(self.send_order_request(req).await?.normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(amount_minor: i64, quantity: i64) -> CheckoutRequest {
        CheckoutRequest {
            trip_name: "Galle Fort Walk".to_string(),
            amount_minor,
            quantity,
            success_url: "https://example.test/ok".to_string(),
            cancel_url: "https://example.test/no".to_string(),
            currency: "USD".to_string(),
        }
    }

    #[test]
    fn order_body_values_items_in_major_units() {
        let body = order_body(&request(2599, 1)).unwrap();
        let unit = &body["purchase_units"][0];
        assert_eq!(unit["items"][0]["unit_amount"]["value"], "25.99");
        assert_eq!(unit["items"][0]["unit_amount"]["currency_code"], "USD");
        assert_eq!(unit["amount"]["value"], "25.99");
        assert_eq!(unit["description"], "Galle Fort Walk");
    }

    #[test]
    fn order_total_multiplies_quantity() {
        let body = order_body(&request(2599, 3)).unwrap();
        assert_eq!(body["purchase_units"][0]["amount"]["value"], "77.97");
        assert_eq!(body["purchase_units"][0]["items"][0]["quantity"], "3");
    }

    #[test]
    fn oversized_total_is_an_error_not_a_panic() {
        let err = order_body(&request(i64::MAX, i64::MAX)).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn order_id_stays_inside_its_path_segment() {
        let base = "https://api-m.sandbox.paypal.com";

        let plain = order_url(base, "PP-1", None).unwrap();
        assert_eq!(plain.as_str(), "https://api-m.sandbox.paypal.com/v2/checkout/orders/PP-1");

        let authorize = order_url(base, "PP-1", Some("authorize")).unwrap();
        assert_eq!(authorize.path(), "/v2/checkout/orders/PP-1/authorize");

        let traversal = order_url(base, "PP-1/../PP-1", None).unwrap();
        assert_eq!(traversal.path(), "/v2/checkout/orders/PP-1%2F..%2FPP-1");

        let query = order_url(base, "PP-1?again", None).unwrap();
        assert_eq!(query.path(), "/v2/checkout/orders/PP-1%3Fagain");
        assert!(query.query().is_none());

        let trailing = order_url("https://paypal.test/", "PP-2", None).unwrap();
        assert_eq!(trailing.path(), "/v2/checkout/orders/PP-2");
    }

    #[test]
    fn normalizes_completed_order() {
        let raw = json!({
            "id": "5O190127TN364715T",
            "status": "COMPLETED",
            "payer": {
                "name": { "given_name": "Ayesha", "surname": "Silva" },
                "email_address": "ayesha@example.test"
            },
            "purchase_units": [{
                "description": "Galle Fort Walk",
                "amount": { "currency_code": "USD", "value": "25.99" },
                "shipping": { "address": { "address_line_1": "12 Lighthouse St", "admin_area_2": "Galle", "country_code": "LK" } },
                "payments": { "captures": [{ "id": "3C679366HH908993F", "status": "COMPLETED" }] }
            }],
            "links": [{ "href": "https://paypal.test/approve", "rel": "approve" }]
        });
        let order: PayPalOrder = serde_json::from_value(raw).unwrap();
        assert_eq!(order.approval_url().as_deref(), Some("https://paypal.test/approve"));

        let normalized = order.normalize();
        assert_eq!(normalized.status, "COMPLETED");
        assert_eq!(normalized.amount, Some(Decimal::new(2599, 2)));
        assert_eq!(normalized.currency.as_deref(), Some("USD"));
        assert_eq!(normalized.transaction_id.as_deref(), Some("3C679366HH908993F"));
        assert_eq!(normalized.payer.first_name.as_deref(), Some("Ayesha"));
        assert_eq!(normalized.payer.city.as_deref(), Some("Galle"));
    }

    #[test]
    fn missing_amount_is_left_empty() {
        let raw = json!({ "id": "ORDER-1", "status": "APPROVED", "purchase_units": [{}] });
        let order: PayPalOrder = serde_json::from_value(raw).unwrap();
        let normalized = order.normalize();
        assert!(normalized.amount.is_none());
        assert!(normalized.currency.is_none());
        assert!(normalized.payer.is_empty());
    }

    #[test]
    fn authorization_status_comes_from_payments() {
        let raw = json!({
            "id": "ORDER-2",
            "status": "COMPLETED",
            "purchase_units": [{
                "amount": { "currency_code": "USD", "value": "10.00" },
                "payments": { "authorizations": [{ "id": "AUTH-1", "status": "CREATED" }] }
            }]
        });
        let order: PayPalOrder = serde_json::from_value(raw).unwrap();
        let normalized = order.normalize();
        assert_eq!(normalized.authorization_status.as_deref(), Some("CREATED"));
        assert_eq!(normalized.transaction_id.as_deref(), Some("AUTH-1"));
    }
}
