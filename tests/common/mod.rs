#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use trip_payments::domain::notification::PayHereNotification;
use trip_payments::domain::payment::{PaymentRecord, PaymentRecordInput, PaymentType};
use trip_payments::gateways::mock::MockGateway;
use trip_payments::gateways::payhere::PayHereSigner;
use trip_payments::http::middleware::csrf::CsrfState;
use trip_payments::http::middleware::rate_limit::RateLimitState;
use trip_payments::repo::in_memory_ledger::InMemoryPaymentLedger;
use trip_payments::repo::ledger::{InsertOutcome, PaymentLedger};
use trip_payments::service::payhere_service::PayHereService;
use trip_payments::service::payment_service::PaymentService;
use trip_payments::AppState;

pub const MERCHANT_ID: &str = "1211149";
pub const MERCHANT_SECRET: &str = "MzQ1NjcxMjM0NTY3ODkwMTIzNDU2Nzg5";

/// In-memory ledger that also keeps every record it accepted, so tests can
/// assert on what was written.
#[derive(Clone, Default)]
pub struct RecordingLedger {
    inner: InMemoryPaymentLedger,
    written: Arc<Mutex<Vec<PaymentRecord>>>,
}

impl RecordingLedger {
    pub async fn written(&self) -> Vec<PaymentRecord> {
        self.written.lock().await.clone()
    }

    pub async fn written_for(&self, order_id: &str) -> Vec<PaymentRecord> {
        self.written()
            .await
            .into_iter()
            .filter(|r| r.order_id == order_id)
            .collect()
    }

    pub async fn is_empty(&self) -> bool {
        self.written.lock().await.is_empty()
    }
}

#[async_trait]
impl PaymentLedger for RecordingLedger {
    async fn find_settled(
        &self,
        order_id: &str,
        payment_type: PaymentType,
    ) -> Result<Option<PaymentRecord>> {
        self.inner.find_settled(order_id, payment_type).await
    }

    async fn record(&self, input: PaymentRecordInput) -> Result<InsertOutcome> {
        let outcome = self.inner.record(input).await?;
        if let InsertOutcome::Inserted(record) = &outcome {
            self.written.lock().await.push(record.clone());
        }
        Ok(outcome)
    }

    async fn latest_for_trip(
        &self,
        trip_name: &str,
        payment_type: PaymentType,
    ) -> Result<Option<PaymentRecord>> {
        self.inner.latest_for_trip(trip_name, payment_type).await
    }

    async fn ping(&self) -> Result<()> {
        self.inner.ping().await
    }
}

pub fn signer() -> PayHereSigner {
    PayHereSigner::new(MERCHANT_ID, MERCHANT_SECRET)
}

pub fn payhere_service(ledger: &RecordingLedger) -> PayHereService {
    PayHereService {
        ledger: Arc::new(ledger.clone()),
        signer: signer(),
    }
}

pub fn payment_service(ledger: &RecordingLedger, behavior: &str) -> PaymentService {
    let mock = Arc::new(MockGateway {
        gateway_name: "mock".to_string(),
        behavior: behavior.to_string(),
    });
    PaymentService {
        ledger: Arc::new(ledger.clone()),
        stripe: mock.clone(),
        paypal_checkout: mock.clone(),
        paypal_orders: mock,
    }
}

/// State for router tests. Redis is only contacted by CSRF and rate-limit
/// middleware, and the rate limiter lets requests through when it is down.
pub fn app_state(ledger: &RecordingLedger) -> AppState {
    let redis_url =
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379/".to_string());
    let redis_client = redis::Client::open(redis_url).unwrap();
    AppState {
        payment_service: payment_service(ledger, "ALWAYS_APPROVED"),
        payhere_service: payhere_service(ledger),
        csrf: CsrfState {
            redis_client: redis_client.clone(),
            secret: "test-session-secret".to_string(),
            ttl_secs: 60,
        },
        rate_limit: RateLimitState {
            redis_client: redis_client.clone(),
            max_per_minute: 100,
        },
        redis_client,
    }
}

pub fn signed_notification(order_id: &str, status_code: &str, custom_1: Option<&str>) -> PayHereNotification {
    let amount = "1500.00";
    let currency = "LKR";
    let md5sig = signer().notification_signature(MERCHANT_ID, order_id, amount, currency, status_code);
    PayHereNotification {
        merchant_id: Some(MERCHANT_ID.to_string()),
        order_id: Some(order_id.to_string()),
        payment_id: Some("320025071278".to_string()),
        payhere_amount: Some(amount.to_string()),
        payhere_currency: Some(currency.to_string()),
        status_code: Some(status_code.to_string()),
        md5sig: Some(md5sig),
        custom_1: custom_1.map(str::to_string),
        ..Default::default()
    }
}
