use crate::error::PaymentError;
use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};

const WINDOW_TTL_SECS: i64 = 120;

#[derive(Clone)]
pub struct RateLimitState {
    pub redis_client: redis::Client,
    pub max_per_minute: i64,
}

impl RateLimitState {
    pub fn window_key(client: &str, now: DateTime<Utc>) -> String {
        format!("trip_payments:rate:{}:{}", client, now.format("%Y%m%d%H%M"))
    }

    async fn hit(&self, key: &str) -> redis::RedisResult<i64> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let (count,): (i64,) = redis::pipe()
            .atomic()
            .incr(key, 1)
            .expire(key, WINDOW_TTL_SECS)
            .ignore()
            .query_async(&mut conn)
            .await?;
        Ok(count)
    }
}

pub fn client_ip(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

pub async fn enforce(
    State(state): State<RateLimitState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client = client_ip(&request);
    let key = RateLimitState::window_key(&client, Utc::now());

    match state.hit(&key).await {
        Ok(count) if count > state.max_per_minute => {
            tracing::warn!("rate limit exceeded for {} on {}", client, request.uri().path());
            return PaymentError::RateLimited.into_response();
        }
        Ok(_) => {}
        Err(e) => tracing::debug!("rate limiter unavailable, letting request through: {}", e),
    }

    next.run(request).await
}
