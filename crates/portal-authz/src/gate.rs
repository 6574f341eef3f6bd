//! Per-request authorization pipeline.
//!
//! # Purpose
//! [`RequestGate`] runs the decision steps for one request, in order, and
//! stops at the first failure:
//!
//! 1. resolve the target's policy;
//! 2. admit public targets without looking at anything else;
//! 3. check the asserted origin service against the trusted services;
//! 4. honour a rejection already reported by the identity provider;
//! 5. decode the credential into an [`Identity`];
//! 6. match roles and modules, then encode the identity header value.
//!
//! # How it fits
//! The gate knows nothing about HTTP. The gateway service reads headers,
//! builds a [`GateRequest`], and maps the returned [`AuthzError`] to a status
//! through [`AuthzError::rejection`].
//!
//! # Concurrency model
//! The gate is shared behind `Arc` and holds only immutable state; every
//! call works on request-owned values.
use crate::{
    AuthorizationDecision, AuthzError, AuthzResult, BearerCredential, ClaimExtractor, Identity,
    OperationTarget, PolicyRegistry, UpstreamRejection, evaluate, validate_origin,
};
use std::sync::Arc;

/// Request facts the gate consults, borrowed from the in-flight request.
#[derive(Debug, Clone, Copy, Default)]
pub struct GateRequest<'a> {
    pub origin_service: Option<&'a str>,
    pub credential: Option<&'a BearerCredential>,
    pub upstream_rejection: Option<&'a UpstreamRejection>,
}

#[derive(Debug)]
pub enum GateOutcome {
    /// Target is public; no identity was consulted.
    Public,
    Authorized {
        identity: Identity,
        /// Encoded value for [`crate::USER_INFO_HEADER`].
        user_info: String,
    },
}

#[derive(Clone)]
pub struct RequestGate {
    registry: Arc<PolicyRegistry>,
    extractor: Arc<dyn ClaimExtractor>,
}

impl RequestGate {
    pub fn new(registry: Arc<PolicyRegistry>, extractor: Arc<dyn ClaimExtractor>) -> Self {
        Self {
            registry,
            extractor,
        }
    }

    pub fn registry(&self) -> &PolicyRegistry {
        &self.registry
    }

    pub fn authorize(
        &self,
        target: &OperationTarget,
        request: GateRequest<'_>,
    ) -> AuthzResult<GateOutcome> {
        tracing::debug!(%target, "authorizing request");
        let result = self.run(target, request);
        if let Err(err) = &result {
            match err {
                AuthzError::InsufficientPrivilege
                | AuthzError::UntrustedOrigin(_)
                | AuthzError::MalformedRequest(_) => {
                    tracing::warn!(%target, error = %err, "authorization denied");
                }
                AuthzError::MissingCredential
                | AuthzError::MalformedCredential(_)
                | AuthzError::UpstreamRejected(_) => {
                    tracing::warn!(%target, error = %err, "credential rejected");
                }
                AuthzError::InternalSerializationFailure(_) | AuthzError::UnknownTag { .. } => {
                    tracing::error!(%target, error = ?err, "unexpected authorization failure");
                }
            }
        }
        result
    }

    fn run(&self, target: &OperationTarget, request: GateRequest<'_>) -> AuthzResult<GateOutcome> {
        if !self.registry.is_declared(target) {
            tracing::debug!(%target, "no policy declared; requiring a valid credential");
        }
        let policy = self.registry.resolve(target);
        if policy.is_public() {
            return Ok(GateOutcome::Public);
        }

        validate_origin(request.origin_service, policy.trusted_services())?;

        if let Some(rejection) = request.upstream_rejection {
            return Err(AuthzError::UpstreamRejected(rejection.clone()));
        }

        let identity = self.extractor.extract(request.credential)?;
        match evaluate(identity, &policy) {
            AuthorizationDecision::Allow(identity) => {
                let user_info = identity.to_header_value()?;
                tracing::debug!(%target, user = identity.display_name(), "request authorized");
                Ok(GateOutcome::Authorized {
                    identity,
                    user_info,
                })
            }
            AuthorizationDecision::Deny(err) => Err(err),
        }
    }
}
