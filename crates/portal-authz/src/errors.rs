use crate::UpstreamRejection;
use thiserror::Error;

/// Generic message returned to callers whose credential could not be used.
pub const UNAUTHORIZED_MESSAGE: &str = "Token validation failed";
/// Generic message returned to callers that were authenticated but refused.
pub const FORBIDDEN_MESSAGE: &str = "Authorization failed";

#[derive(Debug, Error)]
pub enum AuthzError {
    #[error("malformed request: {0}")]
    MalformedRequest(String),
    #[error("service {0} is not authorized to access")]
    UntrustedOrigin(String),
    #[error("token credential is missing")]
    MissingCredential,
    #[error("malformed credential: {0}")]
    MalformedCredential(String),
    #[error("identity lacks the required roles or modules")]
    InsufficientPrivilege,
    #[error("failed to serialize identity context: {0}")]
    InternalSerializationFailure(#[from] serde_json::Error),
    #[error("identity provider rejected the token: {}", .0.cause().unwrap_or("no cause"))]
    UpstreamRejected(UpstreamRejection),
    #[error("unknown {kind}: {value}")]
    UnknownTag { kind: &'static str, value: String },
}

pub type AuthzResult<T> = Result<T, AuthzError>;

/// External outcome an [`AuthzError`] collapses to at the request boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Unauthorized,
    Forbidden,
}

impl Rejection {
    pub fn message(self) -> &'static str {
        match self {
            Rejection::Unauthorized => UNAUTHORIZED_MESSAGE,
            Rejection::Forbidden => FORBIDDEN_MESSAGE,
        }
    }
}

impl AuthzError {
    pub fn rejection(&self) -> Rejection {
        match self {
            AuthzError::MalformedRequest(_)
            | AuthzError::UntrustedOrigin(_)
            | AuthzError::InsufficientPrivilege => Rejection::Forbidden,
            AuthzError::MissingCredential
            | AuthzError::MalformedCredential(_)
            | AuthzError::InternalSerializationFailure(_)
            | AuthzError::UpstreamRejected(_)
            | AuthzError::UnknownTag { .. } => Rejection::Unauthorized,
        }
    }

    /// Message safe to show the caller; never includes the error detail.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthzError::UpstreamRejected(rejection) => rejection.message(),
            other => other.rejection().message(),
        }
    }
}
