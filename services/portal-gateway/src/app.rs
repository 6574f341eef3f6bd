//! Gateway HTTP application wiring.
//!
//! # Purpose
//! Builds the policy registry and the Axum router, and defines the shared
//! application state.
//!
//! # Notes
//! Built-in routes are declared here; a policy file can add to or replace
//! their declarations.
use crate::api;
use crate::config::{GatewayConfig, load_policy_document};
use crate::middleware::gated;
use axum::Router;
use axum::routing::get;
use portal_authz::{
    JwtClaimExtractor, OperationTarget, PolicyDeclaration, PolicyRegistry, PolicyRegistryBuilder,
    RequestGate,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub gate: RequestGate,
}

pub fn system_health_target() -> OperationTarget {
    OperationTarget::new("system", "health")
}

pub fn current_identity_target() -> OperationTarget {
    OperationTarget::new("identity", "me")
}

/// Declarations every gateway starts from. `identity.me` is left undeclared,
/// so it needs a valid credential and nothing more.
pub fn builtin_policies() -> PolicyRegistryBuilder {
    PolicyRegistry::builder().operation(system_health_target(), PolicyDeclaration::public())
}

pub fn build_state(config: &GatewayConfig) -> anyhow::Result<AppState> {
    let mut builder = builtin_policies();
    if let Some(path) = &config.policy_file {
        builder = builder.document(load_policy_document(path)?);
    }
    let registry = builder.build();
    tracing::info!(
        resources = registry.resource_count(),
        operations = registry.operation_count(),
        "policy registry loaded"
    );
    let extractor = JwtClaimExtractor::new(config.claim_mappings.clone());
    Ok(AppState {
        gate: RequestGate::new(Arc::new(registry), Arc::new(extractor)),
    })
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            )
        });

    Router::new()
        .route(
            "/v1/system/health",
            gated(
                &state.gate,
                system_health_target(),
                get(api::system::system_health),
            ),
        )
        .route(
            "/v1/me",
            gated(
                &state.gate,
                current_identity_target(),
                get(api::identity::current_identity),
            ),
        )
        .layer(trace_layer)
        .with_state(state)
}
