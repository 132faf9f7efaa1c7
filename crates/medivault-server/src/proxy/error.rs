// crates/medivault-server/src/proxy/error.rs
// Proxy-boundary errors and their HTTP mapping

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use medivault_types::ErrorBody;

use crate::error::MediVaultError;

pub const INVALID_ACTION: &str = "Invalid action";
pub const RATE_LIMITED: &str = "Rate limit exceeded. Please try again later.";
pub const CREDITS_EXHAUSTED: &str = "AI credits exhausted. Please add credits to continue.";
pub const INVALID_BODY: &str = "Invalid request body";

#[derive(Debug)]
pub enum ProxyError {
    /// `action` is not search/index/generate
    InvalidAction,
    /// Body was not a valid request document
    MalformedBody,
    /// Gateway answered 429
    RateLimited,
    /// Gateway answered 402
    CreditsExhausted,
    /// Everything else surfaces as a 500 with its message
    Internal(String),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::InvalidAction => StatusCode::BAD_REQUEST,
            ProxyError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ProxyError::CreditsExhausted => StatusCode::PAYMENT_REQUIRED,
            ProxyError::MalformedBody | ProxyError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ProxyError::InvalidAction => INVALID_ACTION,
            ProxyError::MalformedBody => INVALID_BODY,
            ProxyError::RateLimited => RATE_LIMITED,
            ProxyError::CreditsExhausted => CREDITS_EXHAUSTED,
            ProxyError::Internal(message) => message,
        }
    }
}

impl From<MediVaultError> for ProxyError {
    fn from(err: MediVaultError) -> Self {
        ProxyError::Internal(err.to_string())
    }
}

impl From<ProxyError> for MediVaultError {
    fn from(err: ProxyError) -> Self {
        MediVaultError::Upstream {
            status: err.status().as_u16(),
            message: err.message().to_string(),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
