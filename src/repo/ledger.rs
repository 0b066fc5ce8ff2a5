use crate::domain::payment::{PaymentRecord, PaymentRecordInput, PaymentType};
use anyhow::Result;
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    Inserted(PaymentRecord),
    AlreadyRecorded,
}

/// Implementations must make `record` atomic with respect to the settled
/// uniqueness rule: two concurrent calls for the same order and processor
/// with settled statuses yield exactly one `Inserted`.
#[async_trait]
pub trait PaymentLedger: Send + Sync {
    async fn find_settled(
        &self,
        order_id: &str,
        payment_type: PaymentType,
    ) -> Result<Option<PaymentRecord>>;

    async fn record(&self, input: PaymentRecordInput) -> Result<InsertOutcome>;

    async fn latest_for_trip(
        &self,
        trip_name: &str,
        payment_type: PaymentType,
    ) -> Result<Option<PaymentRecord>>;

    async fn ping(&self) -> Result<()>;
}
