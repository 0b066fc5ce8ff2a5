use crate::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

pub async fn issue_csrf_token(State(state): State<AppState>) -> impl IntoResponse {
    match state.csrf.issue().await {
        Ok(token) => (
            axum::http::StatusCode::OK,
            Json(serde_json::json!({ "csrfToken": token })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to issue csrf token: {}", e);
            (
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "error": "csrf token store unavailable" })),
            )
                .into_response()
        }
    }
}
