//! Request-time authorization decisions for portal services.
//!
//! # Purpose
//! Decides whether a request may reach its target operation, given the
//! policy declared for that operation, the calling service's asserted origin,
//! and the caller's bearer credential. Allowed requests get a sanitized
//! [`Identity`] for downstream handlers.
//!
//! # How it fits
//! This crate is transport-agnostic. The gateway service hosts it as HTTP
//! middleware, reads headers into a [`GateRequest`], and maps errors to
//! status codes through [`AuthzError::rejection`].
//!
//! # Key invariants
//! - Public targets are admitted without a credential.
//! - Undeclared targets still require a valid credential.
//! - Origin trust is checked before the credential is decoded.
//! - Role and module matching ignores case and needs any one of the
//!   required tags, not all of them.
//! - Credentials are decoded, never verified; verification belongs to the
//!   identity provider integration in front of the gateway.
//!
//! # Examples
//! ```rust
//! use portal_authz::{
//!     GateOutcome, GateRequest, JwtClaimExtractor, OperationTarget, PolicyDeclaration,
//!     PolicyRegistry, RequestGate,
//! };
//! use std::sync::Arc;
//!
//! let registry = PolicyRegistry::builder()
//!     .operation(OperationTarget::new("system", "health"), PolicyDeclaration::public())
//!     .build();
//! let gate = RequestGate::new(Arc::new(registry), Arc::new(JwtClaimExtractor::default()));
//!
//! let outcome = gate
//!     .authorize(&OperationTarget::new("system", "health"), GateRequest::default())
//!     .unwrap();
//! assert!(matches!(outcome, GateOutcome::Public));
//! ```
//!
//! # Common pitfalls
//! - The identity header is not signed. Hosts must strip inbound copies.

mod claims;
mod errors;
mod evaluator;
mod gate;
mod identity;
mod model;
mod policy;
mod trust;
mod types;
mod upstream;

pub use claims::{BearerCredential, ClaimExtractor, ClaimMappings, JwtClaimExtractor};
pub use errors::{AuthzError, AuthzResult, FORBIDDEN_MESSAGE, Rejection, UNAUTHORIZED_MESSAGE};
pub use evaluator::{AuthorizationDecision, evaluate, matches_any};
pub use gate::{GateOutcome, GateRequest, RequestGate};
pub use identity::{Identity, ORIGIN_SERVICE_HEADER, USER_INFO_HEADER};
pub use model::{Module, Role, Service};
pub use policy::{
    AuthorizationPolicy, PolicyDeclaration, PolicyDocument, PolicyRegistry,
    PolicyRegistryBuilder, ResourceDocument, resolve_layers,
};
pub use trust::validate_origin;
pub use types::{OperationName, OperationTarget, ResourceName};
pub use upstream::{UpstreamRejection, UpstreamRejectionKind};
