use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use redis::AsyncCommands;
use sha2::{Digest, Sha256};

pub const CSRF_HEADER: &str = "X-CSRF-Token";

#[derive(Clone)]
pub struct CsrfState {
    pub redis_client: redis::Client,
    pub secret: String,
    pub ttl_secs: u64,
}

pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

pub fn token_key(secret: &str, token: &str) -> String {
    let digest = Sha256::digest(format!("{secret}:{token}").as_bytes());
    format!("csrf:{}", hex::encode(digest))
}

impl CsrfState {
    pub async fn issue(&self) -> redis::RedisResult<String> {
        let token = generate_token();
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn
            .set_ex(token_key(&self.secret, &token), 1, self.ttl_secs)
            .await?;
        Ok(token)
    }

    pub async fn is_valid(&self, token: &str) -> redis::RedisResult<bool> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        conn.exists(token_key(&self.secret, token)).await
    }
}

pub async fn require_csrf_token(
    State(state): State<CsrfState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get(CSRF_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("")
        .to_string();

    let valid = if provided.is_empty() {
        false
    } else {
        match state.is_valid(&provided).await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("csrf lookup failed: {}", e);
                false
            }
        }
    };

    if !valid {
        return Response::builder()
            .status(StatusCode::FORBIDDEN)
            .body(Body::from("invalid csrf token"))
            .unwrap_or_else(|_| Response::new(Body::from("invalid csrf token")));
    }

    next.run(request).await
}
