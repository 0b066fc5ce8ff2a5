use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentType {
    PayHere,
    PayPal,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::PayHere => "PayHere",
            PaymentType::PayPal => "PayPal",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PayHere" => Some(PaymentType::PayHere),
            "PayPal" => Some(PaymentType::PayPal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Success,
    Cancelled,
    Failed,
    Unknown,
    Approved,
    Completed,
}

impl PaymentStatus {
    // Non-integer codes are Unknown too.
    pub fn from_payhere_code(code: &str) -> Self {
        match code.trim().parse::<i32>() {
            Ok(2) => PaymentStatus::Success,
            Ok(0) => PaymentStatus::Pending,
            Ok(-1) => PaymentStatus::Cancelled,
            Ok(-2) => PaymentStatus::Failed,
            _ => PaymentStatus::Unknown,
        }
    }

    pub fn from_paypal_status(status: &str) -> Self {
        match status.trim().to_uppercase().as_str() {
            "APPROVED" => PaymentStatus::Approved,
            "COMPLETED" | "CAPTURED" => PaymentStatus::Completed,
            "CREATED" | "SAVED" | "PAYER_ACTION_REQUIRED" | "PENDING" => PaymentStatus::Pending,
            "VOIDED" => PaymentStatus::Cancelled,
            "DENIED" | "DECLINED" | "FAILED" => PaymentStatus::Failed,
            _ => PaymentStatus::Unknown,
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Success | PaymentStatus::Completed | PaymentStatus::Approved
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Success => "success",
            PaymentStatus::Cancelled => "cancelled",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Unknown => "unknown",
            PaymentStatus::Approved => "approved",
            PaymentStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "pending" => PaymentStatus::Pending,
            "success" => PaymentStatus::Success,
            "cancelled" => PaymentStatus::Cancelled,
            "failed" => PaymentStatus::Failed,
            "approved" => PaymentStatus::Approved,
            "completed" => PaymentStatus::Completed,
            _ => PaymentStatus::Unknown,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl CustomerDetails {
    pub fn is_empty(&self) -> bool {
        *self == CustomerDetails::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub id: Uuid,
    pub payment_type: PaymentType,
    pub order_id: String,
    pub transaction_id: Option<String>,
    pub amount: Decimal,
    pub currency: String,
    pub status: PaymentStatus,
    pub checksum: Option<String>,
    pub trip_name: Option<String>,
    pub customer: CustomerDetails,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct PaymentRecordInput {
    pub payment_type: PaymentType,
    pub order_id: String,
    pub transaction_id: Option<String>,
    pub amount: Decimal,
    pub currency: String,
    pub status: PaymentStatus,
    pub checksum: Option<String>,
    pub trip_name: Option<String>,
    pub customer: CustomerDetails,
}

impl PaymentRecordInput {
    pub fn into_record(self, id: Uuid, created_at: DateTime<Utc>) -> PaymentRecord {
        PaymentRecord {
            id,
            payment_type: self.payment_type,
            order_id: self.order_id,
            transaction_id: self.transaction_id,
            amount: self.amount,
            currency: self.currency,
            status: self.status,
            checksum: self.checksum,
            trip_name: self.trip_name,
            customer: self.customer,
            created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusResponse {
    pub trip_name: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorPayload,
}

#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}
