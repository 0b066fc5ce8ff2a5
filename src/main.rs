use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use trip_payments::config::AppConfig;
use trip_payments::gateways::mock::MockGateway;
use trip_payments::gateways::payhere::PayHereSigner;
use trip_payments::gateways::paypal::PayPalGateway;
use trip_payments::gateways::stripe::StripeGateway;
use trip_payments::gateways::{CheckoutGateway, OrderGateway};
use trip_payments::http::middleware::csrf::CsrfState;
use trip_payments::http::middleware::rate_limit::RateLimitState;
use trip_payments::repo::in_memory_ledger::InMemoryPaymentLedger;
use trip_payments::repo::ledger::PaymentLedger;
use trip_payments::repo::payments_repo::PaymentsRepo;
use trip_payments::service::payhere_service::PayHereService;
use trip_payments::service::payment_service::PaymentService;
use trip_payments::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();
    tracing::debug!("config: {:?}", cfg);

    let ledger: Arc<dyn PaymentLedger> = if cfg.is_mock() {
        tracing::warn!("GATEWAY_MODE=mock: using in-memory ledger and mock processors");
        Arc::new(InMemoryPaymentLedger::new())
    } else {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(&cfg.database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Arc::new(PaymentsRepo { pool })
    };

    let (stripe, paypal_checkout, paypal_orders): (
        Arc<dyn CheckoutGateway>,
        Arc<dyn CheckoutGateway>,
        Arc<dyn OrderGateway>,
    ) = if cfg.is_mock() {
        let mock = Arc::new(MockGateway {
            gateway_name: "mock".to_string(),
            behavior: cfg.mock_gateway_behavior.clone(),
        });
        (
            mock.clone() as Arc<dyn CheckoutGateway>,
            mock.clone() as Arc<dyn CheckoutGateway>,
            mock as Arc<dyn OrderGateway>,
        )
    } else {
        let client = reqwest::Client::new();
        let paypal = Arc::new(PayPalGateway {
            base_url: cfg.paypal_base_url.clone(),
            client_id: cfg.paypal_client_id.clone(),
            client_secret: cfg.paypal_client_secret.clone(),
            timeout_ms: cfg.gateway_timeout_ms,
            client: client.clone(),
        });
        let stripe = Arc::new(StripeGateway {
            base_url: cfg.stripe_base_url.clone(),
            secret_key: cfg.stripe_secret_key.clone(),
            timeout_ms: cfg.gateway_timeout_ms,
            client,
        });
        (
            stripe as Arc<dyn CheckoutGateway>,
            paypal.clone() as Arc<dyn CheckoutGateway>,
            paypal as Arc<dyn OrderGateway>,
        )
    };

    let redis_client = redis::Client::open(cfg.redis_url.clone())?;

    let state = AppState {
        payment_service: PaymentService {
            ledger: ledger.clone(),
            stripe,
            paypal_checkout,
            paypal_orders,
        },
        payhere_service: PayHereService {
            ledger,
            signer: PayHereSigner::new(
                cfg.payhere_merchant_id.clone(),
                cfg.payhere_merchant_secret.clone(),
            ),
        },
        csrf: CsrfState {
            redis_client: redis_client.clone(),
            secret: cfg.session_secret.clone(),
            ttl_secs: cfg.csrf_token_ttl_secs,
        },
        rate_limit: RateLimitState {
            redis_client: redis_client.clone(),
            max_per_minute: cfg.rate_limit_per_minute,
        },
        redis_client,
    };

    let app = trip_payments::http::routes::router(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
