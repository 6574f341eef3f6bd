//! API error types and helpers.
//!
//! # Purpose and responsibility
//! Centralizes HTTP error response construction so every refusal from the
//! gateway has the same JSON shape.
//!
//! # Key invariants and assumptions
//! - Error responses carry a stable `code` and a human-readable `message`.
//! - Status codes align with the error category: credential problems are 401,
//!   trust and privilege problems are 403.
//!
//! # Security considerations
//! - Authorization failures log details server-side but return the generic
//!   messages from `portal-authz`. Claim contents never reach the body.
use crate::api::types::ErrorResponse;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use portal_authz::{AuthzError, Rejection};

/// Structured API error returned by handlers and middleware.
///
/// # Invariants
/// - `status` must match the semantics of `body.code`.
///
/// # Example
/// ```rust
/// use axum::http::StatusCode;
/// use portal_gateway::api::error::ApiError;
/// use portal_gateway::api::types::ErrorResponse;
///
/// let err = ApiError {
///     status: StatusCode::FORBIDDEN,
///     body: ErrorResponse {
///         code: "forbidden".to_string(),
///         message: "Authorization failed".to_string(),
///         request_id: None,
///     },
/// };
/// ```
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Build a 401 Unauthorized error.
///
/// # Errors
/// - Does not fail.
pub fn api_unauthorized(message: &str) -> ApiError {
    ApiError {
        status: StatusCode::UNAUTHORIZED,
        body: ErrorResponse {
            code: "unauthorized".to_string(),
            message: message.to_string(),
            request_id: None,
        },
    }
}

/// Build a 403 Forbidden error.
///
/// # Errors
/// - Does not fail.
pub fn api_forbidden(message: &str) -> ApiError {
    // Authenticated, or never got that far, but not allowed through.
    ApiError {
        status: StatusCode::FORBIDDEN,
        body: ErrorResponse {
            code: "forbidden".to_string(),
            message: message.to_string(),
            request_id: None,
        },
    }
}

/// Translate a gate refusal into its HTTP response.
///
/// # What it does
/// Picks 401 or 403 from [`AuthzError::rejection`] and uses
/// [`AuthzError::public_message`] as the body message.
pub fn api_rejected(err: &AuthzError) -> ApiError {
    match err.rejection() {
        Rejection::Unauthorized => api_unauthorized(err.public_message()),
        Rejection::Forbidden => api_forbidden(err.public_message()),
    }
}
