use crate::domain::checkout::PayHereInitiateRequest;
use crate::domain::notification::{
    AckStatus, CheckoutMetadata, NotificationAck, PayHereInitiation, PayHereNotification,
};
use crate::domain::payment::{PaymentRecordInput, PaymentStatus, PaymentType};
use crate::error::PaymentError;
use crate::gateways::payhere::PayHereSigner;
use crate::repo::ledger::{InsertOutcome, PaymentLedger};
use rust_decimal::Decimal;
use std::sync::Arc;

#[derive(Clone)]
pub struct PayHereService {
    pub ledger: Arc<dyn PaymentLedger>,
    pub signer: PayHereSigner,
}

impl PayHereService {
    pub fn initiate(&self, body: &serde_json::Value) -> Result<PayHereInitiation, PaymentError> {
        let req = PayHereInitiateRequest::from_json(body)?;
        let hash = self.signer.checkout_hash(&req.order_id, req.amount, &req.currency);

        let metadata = CheckoutMetadata {
            trip_name: req.trip_name,
            customer: req.customer,
        };
        let custom_1 = serde_json::to_string(&metadata)
            .map_err(|e| PaymentError::InvalidInput(format!("unserializable customer details: {e}")))?;

        tracing::info!("initiated payhere checkout for order {}", req.order_id);
        Ok(PayHereInitiation {
            success: true,
            status: "initiated".to_string(),
            hash,
            custom_1,
        })
    }

    pub async fn handle_notification(
        &self,
        notification: &PayHereNotification,
    ) -> Result<NotificationAck, PaymentError> {
        let fields = notification.signed_fields()?;

        if !self.signer.verify(&fields) {
            tracing::warn!("rejected payhere notification for order {}: bad signature", fields.order_id);
            return Err(PaymentError::SignatureMismatch);
        }

        let status = PaymentStatus::from_payhere_code(fields.status_code);
        let order_id = fields.order_id.to_string();

        if status != PaymentStatus::Success {
            tracing::info!("payhere order {} reported {}", order_id, status.as_str());
            return Ok(NotificationAck {
                status: AckStatus::NotificationReceived,
                payment_status: status,
                order_id,
            });
        }

        if self
            .ledger
            .find_settled(&order_id, PaymentType::PayHere)
            .await
            .map_err(PaymentError::Persistence)?
            .is_some()
        {
            tracing::info!("payhere order {} already processed", order_id);
            return Ok(NotificationAck {
                status: AckStatus::AlreadyProcessed,
                payment_status: status,
                order_id,
            });
        }

        let amount = fields.amount.parse::<Decimal>().map_err(|_| {
            PaymentError::InvalidInput(format!("payhere_amount is not a number: {}", fields.amount))
        })?;
        let metadata = CheckoutMetadata::parse_lenient(notification.custom_1.as_deref());

        let input = PaymentRecordInput {
            payment_type: PaymentType::PayHere,
            order_id: order_id.clone(),
            transaction_id: notification.transaction_id(),
            amount,
            currency: fields.currency.to_string(),
            status,
            checksum: Some(fields.signature.to_string()),
            trip_name: metadata.trip_name,
            customer: metadata.customer,
        };

        let ack_status = match self
            .ledger
            .record(input)
            .await
            .map_err(PaymentError::Persistence)?
        {
            InsertOutcome::Inserted(record) => {
                tracing::info!("recorded payhere payment {} for order {}", record.id, order_id);
                AckStatus::NotificationProcessed
            }
            InsertOutcome::AlreadyRecorded => {
                tracing::info!("payhere order {} recorded by a concurrent notification", order_id);
                AckStatus::AlreadyProcessed
            }
        };

        Ok(NotificationAck {
            status: ack_status,
            payment_status: status,
            order_id,
        })
    }
}
