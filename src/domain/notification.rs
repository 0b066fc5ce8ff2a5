use crate::domain::payment::{CustomerDetails, PaymentStatus};
use crate::error::PaymentError;
use serde::{Deserialize, Serialize};

// All optional so absent fields become a 400 from signed_fields().
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PayHereNotification {
    pub merchant_id: Option<String>,
    pub order_id: Option<String>,
    pub payment_id: Option<String>,
    pub payhere_amount: Option<String>,
    pub payhere_currency: Option<String>,
    pub status_code: Option<String>,
    pub md5sig: Option<String>,
    pub custom_1: Option<String>,
    pub custom_2: Option<String>,
    pub method: Option<String>,
    pub status_message: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct SignedFields<'a> {
    pub merchant_id: &'a str,
    pub order_id: &'a str,
    pub amount: &'a str,
    pub currency: &'a str,
    pub status_code: &'a str,
    pub signature: &'a str,
}

impl PayHereNotification {
    pub fn signed_fields(&self) -> Result<SignedFields<'_>, PaymentError> {
        Ok(SignedFields {
            merchant_id: required(&self.merchant_id, "merchant_id")?,
            order_id: required(&self.order_id, "order_id")?,
            amount: required(&self.payhere_amount, "payhere_amount")?,
            currency: required(&self.payhere_currency, "payhere_currency")?,
            status_code: required(&self.status_code, "status_code")?,
            signature: required(&self.md5sig, "md5sig")?,
        })
    }

    pub fn transaction_id(&self) -> Option<String> {
        self.payment_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, PaymentError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| PaymentError::InvalidInput(format!("missing required field: {name}")))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip_name: Option<String>,
    #[serde(flatten)]
    pub customer: CustomerDetails,
}

impl CheckoutMetadata {
    /// Never fails: missing or malformed metadata yields an empty value.
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::default();
        };

        match serde_json::from_str::<CheckoutMetadata>(raw) {
            Ok(meta) => meta,
            Err(e) => {
                tracing::warn!("ignoring malformed checkout metadata: {}", e);
                Self::default()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AckStatus {
    NotificationProcessed,
    AlreadyProcessed,
    NotificationReceived,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationAck {
    pub status: AckStatus,
    pub payment_status: PaymentStatus,
    pub order_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PayHereInitiation {
    pub success: bool,
    pub status: String,
    pub hash: String,
    pub custom_1: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_parses_trip_and_customer() {
        let meta = CheckoutMetadata::parse_lenient(Some(
            r#"{"tripName":"Sigiriya","firstName":"Nimal","email":"nimal@example.test"}"#,
        ));
        assert_eq!(meta.trip_name.as_deref(), Some("Sigiriya"));
        assert_eq!(meta.customer.first_name.as_deref(), Some("Nimal"));
        assert_eq!(meta.customer.email.as_deref(), Some("nimal@example.test"));
        assert!(meta.customer.city.is_none());
    }

    #[test]
    fn malformed_metadata_degrades_to_empty() {
        for raw in [Some("{not json"), Some("null"), Some("[1,2]"), Some("   "), None] {
            let meta = CheckoutMetadata::parse_lenient(raw);
            assert_eq!(meta, CheckoutMetadata::default(), "raw {raw:?}");
        }
    }

    #[test]
    fn blank_required_field_is_reported_by_name() {
        let n = PayHereNotification {
            merchant_id: Some("1211149".to_string()),
            order_id: Some("  ".to_string()),
            ..Default::default()
        };
        let err = n.signed_fields().unwrap_err();
        assert_eq!(err.to_string(), "missing required field: order_id");
    }
}
