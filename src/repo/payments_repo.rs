use crate::domain::payment::{
    CustomerDetails, PaymentRecord, PaymentRecordInput, PaymentStatus, PaymentType,
};
use crate::repo::ledger::{InsertOutcome, PaymentLedger};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

const RECORD_COLUMNS: &str = "id, payment_type, order_id, transaction_id, amount, currency, status, checksum, trip_name, customer, created_at";

#[derive(Clone)]
pub struct PaymentsRepo {
    pub pool: PgPool,
}

fn to_record(r: PgRow) -> Result<PaymentRecord> {
    let payment_type: String = r.get("payment_type");
    let status: String = r.get("status");
    let customer: Json<CustomerDetails> = r.get("customer");

    Ok(PaymentRecord {
        id: r.get("id"),
        payment_type: PaymentType::parse(&payment_type)
            .ok_or_else(|| anyhow!("unknown payment_type in ledger: {payment_type}"))?,
        order_id: r.get("order_id"),
        transaction_id: r.get("transaction_id"),
        amount: r.get("amount"),
        currency: r.get("currency"),
        status: PaymentStatus::parse(&status),
        checksum: r.get("checksum"),
        trip_name: r.get("trip_name"),
        customer: customer.0,
        created_at: r.get("created_at"),
    })
}

#[async_trait]
impl PaymentLedger for PaymentsRepo {
    async fn find_settled(
        &self,
        order_id: &str,
        payment_type: PaymentType,
    ) -> Result<Option<PaymentRecord>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {RECORD_COLUMNS}
            FROM payment_records
            WHERE order_id = $1 AND payment_type = $2
              AND status IN ('success', 'completed', 'approved')
            "#
        ))
        .bind(order_id)
        .bind(payment_type.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(to_record).transpose()
    }

    async fn record(&self, input: PaymentRecordInput) -> Result<InsertOutcome> {
        // Settled duplicates hit payment_records_settled_uniq and are skipped.
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO payment_records (
                id, payment_type, order_id, transaction_id, amount, currency,
                status, checksum, trip_name, customer, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, now())
            ON CONFLICT DO NOTHING
            RETURNING {RECORD_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(input.payment_type.as_str())
        .bind(&input.order_id)
        .bind(&input.transaction_id)
        .bind(input.amount)
        .bind(&input.currency)
        .bind(input.status.as_str())
        .bind(&input.checksum)
        .bind(&input.trip_name)
        .bind(Json(&input.customer))
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(InsertOutcome::Inserted(to_record(r)?)),
            None => Ok(InsertOutcome::AlreadyRecorded),
        }
    }

    async fn latest_for_trip(
        &self,
        trip_name: &str,
        payment_type: PaymentType,
    ) -> Result<Option<PaymentRecord>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {RECORD_COLUMNS}
            FROM payment_records
            WHERE trip_name = $1 AND payment_type = $2
            ORDER BY created_at DESC
            LIMIT 1
            "#
        ))
        .bind(trip_name)
        .bind(payment_type.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(to_record).transpose()
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
