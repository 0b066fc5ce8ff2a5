use crate::domain::payment::{ErrorEnvelope, ErrorPayload};
use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("signature verification failed")]
    SignatureMismatch,
    #[error("processor response broke the integration contract: {0}")]
    IntegrationContract(String),
    #[error("failed to persist payment record: {0}")]
    Persistence(anyhow::Error),
    #[error("payment processor request failed: {0}")]
    Processor(anyhow::Error),
    #[error("too many requests, try again in a minute")]
    RateLimited,
}

impl PaymentError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PaymentError::InvalidInput(_) | PaymentError::SignatureMismatch => StatusCode::BAD_REQUEST,
            PaymentError::IntegrationContract(_) | PaymentError::Persistence(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            PaymentError::Processor(_) => StatusCode::BAD_GATEWAY,
            PaymentError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            PaymentError::InvalidInput(_) => "INVALID_INPUT",
            PaymentError::SignatureMismatch => "SIGNATURE_MISMATCH",
            PaymentError::IntegrationContract(_) => "INTEGRATION_CONTRACT_VIOLATION",
            PaymentError::Persistence(_) => "PERSISTENCE_ERROR",
            PaymentError::Processor(_) => "PROCESSOR_ERROR",
            PaymentError::RateLimited => "RATE_LIMITED",
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        let (message, details) = match self {
            PaymentError::Persistence(e) => {
                ("failed to persist payment record".to_string(), Some(format!("{e:#}")))
            }
            PaymentError::Processor(e) => {
                ("payment processor request failed".to_string(), Some(format!("{e:#}")))
            }
            other => (other.to_string(), None),
        };

        ErrorEnvelope {
            error: ErrorPayload {
                code: self.code().to_string(),
                message,
                details,
            },
        }
    }
}

impl From<JsonRejection> for PaymentError {
    fn from(rejection: JsonRejection) -> Self {
        PaymentError::InvalidInput(rejection.body_text())
    }
}

impl From<FormRejection> for PaymentError {
    fn from(rejection: FormRejection) -> Self {
        PaymentError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for PaymentError {
    fn into_response(self) -> Response {
        if self.status_code().is_server_error() {
            tracing::error!("{} ({})", self, self.code());
        }
        (self.status_code(), Json(self.envelope())).into_response()
    }
}
