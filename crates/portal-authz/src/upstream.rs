//! Rejections reported by the identity-provider integration.
//!
//! # Purpose
//! Token verification happens outside this crate. When that layer rejects a
//! token it records an [`UpstreamRejection`]; the gate turns it into a 401
//! with a short, classified message instead of the provider's raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamRejectionKind {
    Expired,
    Invalid,
    WrongIssuer,
    Other,
}

impl UpstreamRejectionKind {
    pub fn message(self) -> &'static str {
        match self {
            UpstreamRejectionKind::Expired => "Token has expired.",
            UpstreamRejectionKind::Invalid => "Token is invalid.",
            UpstreamRejectionKind::WrongIssuer => "Token issuer is incorrect.",
            UpstreamRejectionKind::Other => "Authentication error occurred.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRejection {
    kind: UpstreamRejectionKind,
    cause: Option<String>,
}

impl UpstreamRejection {
    pub fn new(kind: UpstreamRejectionKind) -> Self {
        Self { kind, cause: None }
    }

    /// Classify from the provider's cause text. Checked in order: `expired`,
    /// `invalid`, `issuer`.
    pub fn from_cause(cause: Option<&str>) -> Self {
        let kind = match cause {
            Some(text) if text.contains("expired") => UpstreamRejectionKind::Expired,
            Some(text) if text.contains("invalid") => UpstreamRejectionKind::Invalid,
            Some(text) if text.contains("issuer") => UpstreamRejectionKind::WrongIssuer,
            _ => UpstreamRejectionKind::Other,
        };
        Self {
            kind,
            cause: cause.map(str::to_string),
        }
    }

    pub fn kind(&self) -> UpstreamRejectionKind {
        self.kind
    }

    /// Provider detail for server-side logs only.
    pub fn cause(&self) -> Option<&str> {
        self.cause.as_deref()
    }

    pub fn message(&self) -> &'static str {
        self.kind.message()
    }
}
