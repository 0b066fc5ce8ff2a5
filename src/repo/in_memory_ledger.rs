use crate::domain::payment::{PaymentRecord, PaymentRecordInput, PaymentType};
use crate::repo::ledger::{InsertOutcome, PaymentLedger};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

// Used by tests and GATEWAY_MODE=mock. The settled check and the insert share
// one write lock.
#[derive(Default, Clone)]
pub struct InMemoryPaymentLedger {
    records: Arc<RwLock<Vec<PaymentRecord>>>,
}

impl InMemoryPaymentLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

fn is_settled_match(r: &PaymentRecord, order_id: &str, payment_type: PaymentType) -> bool {
    r.order_id == order_id && r.payment_type == payment_type && r.status.is_settled()
}

#[async_trait]
impl PaymentLedger for InMemoryPaymentLedger {
    async fn find_settled(
        &self,
        order_id: &str,
        payment_type: PaymentType,
    ) -> Result<Option<PaymentRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .find(|r| is_settled_match(r, order_id, payment_type))
            .cloned())
    }

    async fn record(&self, input: PaymentRecordInput) -> Result<InsertOutcome> {
        let mut records = self.records.write().await;
        if input.status.is_settled()
            && records
                .iter()
                .any(|r| is_settled_match(r, &input.order_id, input.payment_type))
        {
            return Ok(InsertOutcome::AlreadyRecorded);
        }

        let record = input.into_record(uuid::Uuid::new_v4(), chrono::Utc::now());
        records.push(record.clone());
        Ok(InsertOutcome::Inserted(record))
    }

    async fn latest_for_trip(
        &self,
        trip_name: &str,
        payment_type: PaymentType,
    ) -> Result<Option<PaymentRecord>> {
        let records = self.records.read().await;
        // Insertion order is write order, so the last match is the latest.
        Ok(records
            .iter()
            .rev()
            .find(|r| r.payment_type == payment_type && r.trip_name.as_deref() == Some(trip_name))
            .cloned())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
