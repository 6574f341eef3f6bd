//! Identity echo endpoint.
//!
//! # Purpose and responsibility
//! Returns the identity context the gate attached to the request. It reads
//! the `X-User-Info` header the same way any downstream handler would, so it
//! doubles as a check of that contract.
//!
//! # Security considerations
//! - The header is trusted only because the gate middleware strips inbound
//!   copies before setting its own. Never mount this handler ungated.
use crate::api::error::{ApiError, api_unauthorized};
use axum::Json;
use axum::http::HeaderMap;
use portal_authz::{Identity, UNAUTHORIZED_MESSAGE, USER_INFO_HEADER};

pub(crate) async fn current_identity(headers: HeaderMap) -> Result<Json<Identity>, ApiError> {
    let value = headers
        .get(USER_INFO_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| api_unauthorized(UNAUTHORIZED_MESSAGE))?;
    let identity = Identity::from_header_value(value).map_err(|err| {
        tracing::error!(error = %err, "gateway produced an unreadable identity header");
        api_unauthorized(UNAUTHORIZED_MESSAGE)
    })?;
    Ok(Json(identity))
}
