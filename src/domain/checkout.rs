use crate::domain::payment::CustomerDetails;
use crate::error::PaymentError;
use rust_decimal::Decimal;
use serde_json::Value;

const ZERO_DECIMAL_CURRENCIES: &[&str] = &[
    "BIF", "CLP", "DJF", "GNF", "JPY", "KMF", "KRW", "MGA", "PYG", "RWF", "UGX", "VND", "VUV",
    "XAF", "XOF", "XPF",
];

pub fn currency_exponent(currency: &str) -> u32 {
    if ZERO_DECIMAL_CURRENCIES.contains(&currency.to_uppercase().as_str()) {
        0
    } else {
        2
    }
}

pub fn minor_to_major(amount_minor: i64, currency: &str) -> Decimal {
    Decimal::new(amount_minor, currency_exponent(currency))
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRequest {
    pub trip_name: String,
    pub amount_minor: i64,
    pub quantity: i64,
    pub success_url: String,
    pub cancel_url: String,
    pub currency: String,
}

impl CheckoutRequest {
    pub fn from_json(body: &Value) -> Result<Self, PaymentError> {
        let request = Self {
            trip_name: required_str(body, "tripName")?,
            amount_minor: positive_int(body, "amount")?,
            quantity: positive_int(body, "quantity")?,
            success_url: required_str(body, "successUrl")?,
            cancel_url: required_str(body, "cancelUrl")?,
            currency: optional_str(body, "currency")?
                .map(|c| c.to_uppercase())
                .unwrap_or_else(|| "USD".to_string()),
        };

        if request.line_item().total_amount().is_none() {
            return Err(PaymentError::InvalidInput(
                "amount times quantity is too large".to_string(),
            ));
        }
        Ok(request)
    }

    pub fn line_item(&self) -> LineItem {
        LineItem {
            name: self.trip_name.clone(),
            quantity: self.quantity,
            unit_amount_minor: self.amount_minor,
            currency: self.currency.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub name: String,
    pub quantity: i64,
    pub unit_amount_minor: i64,
    pub currency: String,
}

impl LineItem {
    pub fn unit_amount(&self) -> Decimal {
        minor_to_major(self.unit_amount_minor, &self.currency)
    }

    pub fn total_amount(&self) -> Option<Decimal> {
        self.unit_amount().checked_mul(Decimal::from(self.quantity))
    }

    pub fn format_amount(&self, amount: Decimal) -> String {
        format!("{:.*}", currency_exponent(&self.currency) as usize, amount)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PayHereInitiateRequest {
    pub order_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub trip_name: Option<String>,
    pub customer: CustomerDetails,
}

impl PayHereInitiateRequest {
    pub fn from_json(body: &Value) -> Result<Self, PaymentError> {
        let customer = CustomerDetails {
            first_name: Some(required_str(body, "firstName")?),
            last_name: Some(required_str(body, "lastName")?),
            email: Some(required_str(body, "email")?),
            phone: optional_str(body, "phone")?,
            address: optional_str(body, "address")?,
            city: optional_str(body, "city")?,
            country: optional_str(body, "country")?,
        };

        Ok(Self {
            order_id: required_str(body, "orderId")?,
            amount: positive_decimal(body, "amount")?,
            currency: required_str(body, "currency")?.to_uppercase(),
            trip_name: optional_str(body, "tripName")?,
            customer,
        })
    }
}

const MAX_ORDER_ID_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct CaptureRequest {
    pub order_id: String,
}

impl CaptureRequest {
    /// Accepts ASCII letters, digits and `-`, at most 64 characters.
    pub fn from_json(body: &Value) -> Result<Self, PaymentError> {
        let order_id = required_str(body, "orderId")?;
        if order_id.len() > MAX_ORDER_ID_LEN
            || !order_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(PaymentError::InvalidInput(
                "orderId may only contain letters, digits and '-'".to_string(),
            ));
        }
        Ok(Self { order_id })
    }
}

fn required_str(body: &Value, key: &str) -> Result<String, PaymentError> {
    match body.get(key) {
        None | Some(Value::Null) => Err(PaymentError::InvalidInput(format!("{key} is required"))),
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(Value::String(_)) => Err(PaymentError::InvalidInput(format!("{key} must not be empty"))),
        Some(_) => Err(PaymentError::InvalidInput(format!("{key} must be a string"))),
    }
}

fn optional_str(body: &Value, key: &str) -> Result<Option<String>, PaymentError> {
    match body.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(_) => Err(PaymentError::InvalidInput(format!("{key} must be a string"))),
    }
}

fn positive_int(body: &Value, key: &str) -> Result<i64, PaymentError> {
    match body.get(key) {
        None | Some(Value::Null) => Err(PaymentError::InvalidInput(format!("{key} is required"))),
        Some(v) => match v.as_i64() {
            Some(n) if n > 0 => Ok(n),
            _ => Err(PaymentError::InvalidInput(format!(
                "{key} must be a positive integer"
            ))),
        },
    }
}

fn positive_decimal(body: &Value, key: &str) -> Result<Decimal, PaymentError> {
    let parsed = match body.get(key) {
        None | Some(Value::Null) => {
            return Err(PaymentError::InvalidInput(format!("{key} is required")))
        }
        Some(Value::String(s)) => s.trim().parse::<Decimal>().ok(),
        Some(Value::Number(n)) => n.to_string().parse::<Decimal>().ok(),
        Some(_) => None,
    };

    match parsed {
        Some(d) if d > Decimal::ZERO => Ok(d),
        _ => Err(PaymentError::InvalidInput(format!(
            "{key} must be a positive number"
        ))),
    }
}
