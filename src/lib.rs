pub mod config;
pub mod domain {
    pub mod checkout;
    pub mod notification;
    pub mod payment;
}
pub mod error;
pub mod gateways;
pub mod http {
    pub mod handlers {
        pub mod csrf;
        pub mod ops;
        pub mod payhere;
        pub mod payments;
    }
    pub mod middleware {
        pub mod csrf;
        pub mod rate_limit;
    }
    pub mod routes;
}
pub mod repo {
    pub mod in_memory_ledger;
    pub mod ledger;
    pub mod payments_repo;
}
pub mod service {
    pub mod payhere_service;
    pub mod payment_service;
}

#[derive(Clone)]
pub struct AppState {
    pub payment_service: service::payment_service::PaymentService,
    pub payhere_service: service::payhere_service::PayHereService,
    pub csrf: http::middleware::csrf::CsrfState,
    pub rate_limit: http::middleware::rate_limit::RateLimitState,
    pub redis_client: redis::Client,
}
