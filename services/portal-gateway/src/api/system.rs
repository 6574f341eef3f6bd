//! System API handlers.
//!
//! # Purpose and responsibility
//! Provides the liveness endpoint used by probes. The route is declared
//! public, so the gate admits it without a credential.
use crate::api::types::HealthStatus;
use axum::Json;

/// Return gateway health status.
///
/// # Errors
/// - Does not return errors.
pub(crate) async fn system_health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
    })
}
