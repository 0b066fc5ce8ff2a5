use crate::http::handlers::{csrf, ops, payhere, payments};
use crate::http::middleware::csrf::require_csrf_token;
use crate::http::middleware::rate_limit;
use crate::AppState;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;

// Rate limiting and CSRF cover browser traffic only. Probes and the PayHere
// server callback bypass both.
pub fn router(state: AppState) -> Router {
    let csrf_protected = Router::new()
        .route("/initiate/payhere", post(payhere::initiate_payhere))
        .route(
            "/create-checkout-session/paypal",
            post(payments::create_paypal_checkout),
        )
        .route(
            "/create-checkout-session/stripe",
            post(payments::create_stripe_checkout),
        )
        .route("/capture-paypal-payment", post(payments::capture_paypal_payment))
        .route_layer(from_fn_with_state(state.csrf.clone(), require_csrf_token));

    let browser_routes = Router::new()
        .route("/csrf-token", get(csrf::issue_csrf_token))
        .route(
            "/check-order-status/:trip_name",
            get(payments::check_order_status),
        )
        .merge(csrf_protected)
        .route_layer(from_fn_with_state(
            state.rate_limit.clone(),
            rate_limit::enforce,
        ));

    Router::new()
        .route("/health", get(payments::health))
        .route("/ops/liveness", get(ops::liveness))
        .route("/ops/readiness", get(ops::readiness))
        .route("/notify/payhere", post(payhere::notify_payhere))
        .merge(browser_routes)
        .with_state(state)
}
