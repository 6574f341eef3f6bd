//! Authorization gate middleware.
//!
//! # Purpose
//! Runs [`RequestGate::authorize`] in front of a route and either forwards the
//! request with an identity context attached or answers with 401/403.
//!
//! # How it fits
//! Each gated route gets its own [`GateRoute`], pairing the shared gate with
//! the route's [`OperationTarget`]. Mount it with [`gated`], or directly with
//! `axum::middleware::from_fn_with_state(route, enforce)`.
//!
//! # Key invariants
//! - An inbound `X-User-Info` header is always removed, public routes
//!   included, before the handler can see it.
//! - Refusals never carry claim contents or error detail.
//! - A [`UpstreamRejection`] placed in the request extensions by an earlier
//!   layer is honoured on non-public routes.
use crate::api::error::{api_rejected, api_unauthorized};
use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::routing::MethodRouter;
use portal_authz::{
    AuthzError, BearerCredential, GateOutcome, GateRequest, ORIGIN_SERVICE_HEADER, OperationTarget,
    Rejection, RequestGate, UNAUTHORIZED_MESSAGE, USER_INFO_HEADER, UpstreamRejection,
};

const DECISIONS_METRIC: &str = "portal_authz_decisions_total";

/// Gate plus the target a single route is declared as.
#[derive(Clone)]
pub struct GateRoute {
    gate: RequestGate,
    target: OperationTarget,
}

impl GateRoute {
    pub fn new(gate: RequestGate, target: OperationTarget) -> Self {
        Self { gate, target }
    }

    pub fn target(&self) -> &OperationTarget {
        &self.target
    }
}

pub async fn enforce(State(route): State<GateRoute>, mut request: Request, next: Next) -> Response {
    request.headers_mut().remove(USER_INFO_HEADER);

    let outcome = {
        let headers = request.headers();
        let origin_service = headers
            .get(ORIGIN_SERVICE_HEADER)
            .and_then(|value| value.to_str().ok());
        let credential = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(BearerCredential::from_authorization);
        let upstream_rejection = request.extensions().get::<UpstreamRejection>();
        route.gate.authorize(
            &route.target,
            GateRequest {
                origin_service,
                credential: credential.as_ref(),
                upstream_rejection,
            },
        )
    };

    match outcome {
        Ok(GateOutcome::Public) => {
            record_decision("public");
            next.run(request).await
        }
        Ok(GateOutcome::Authorized {
            identity,
            user_info,
        }) => {
            let value = match HeaderValue::from_str(&user_info) {
                Ok(value) => value,
                Err(err) => {
                    tracing::error!(
                        operation = %route.target(),
                        error = %err,
                        "identity header value rejected"
                    );
                    record_decision("unauthorized");
                    return api_unauthorized(UNAUTHORIZED_MESSAGE).into_response();
                }
            };
            request.headers_mut().insert(USER_INFO_HEADER, value);
            request.extensions_mut().insert(identity);
            record_decision("allowed");
            next.run(request).await
        }
        Err(err) => refuse(&err),
    }
}

fn refuse(err: &AuthzError) -> Response {
    record_decision(match err.rejection() {
        Rejection::Unauthorized => "unauthorized",
        Rejection::Forbidden => "forbidden",
    });
    api_rejected(err).into_response()
}

fn record_decision(outcome: &'static str) {
    metrics::counter!(DECISIONS_METRIC, "outcome" => outcome).increment(1);
}

/// Wrap a method router so every request to it passes through the gate as
/// `target`.
pub fn gated<S>(gate: &RequestGate, target: OperationTarget, route: MethodRouter<S>) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.route_layer(axum::middleware::from_fn_with_state(
        GateRoute::new(gate.clone(), target),
        enforce,
    ))
}
