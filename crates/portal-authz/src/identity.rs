//! Identity decoded from a credential and its downstream header encoding.
//!
//! # Purpose
//! [`Identity`] is the request-scoped view of the caller. Once a request is
//! allowed it is forwarded to handlers as base64-encoded JSON in the
//! [`USER_INFO_HEADER`] header.
//!
//! # Key invariants
//! - Optional claims stay `None` when absent; they serialize as `null`.
//! - Array claims that were absent are empty sequences.
//! - The header value is plain base64 of JSON. It is not signed, so the
//!   gateway strips any caller-supplied copy before handlers run.
use crate::{AuthzError, AuthzResult};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Header carrying the serialized identity to downstream handlers.
pub const USER_INFO_HEADER: &str = "x-user-info";
/// Header in which calling services assert their own identity.
pub const ORIGIN_SERVICE_HEADER: &str = "x-origin-service";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(rename = "sub")]
    pub subject_id: Option<String>,
    pub username: Option<String>,
    #[serde(rename = "given_name")]
    pub first_name: Option<String>,
    #[serde(rename = "family_name")]
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub modules: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, Vec<String>>,
}

impl Identity {
    /// Name suitable for log lines; falls back to the subject id.
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .or(self.subject_id.as_deref())
            .unwrap_or("<anonymous>")
    }

    pub fn to_header_value(&self) -> AuthzResult<String> {
        let json = serde_json::to_vec(self)?;
        Ok(STANDARD.encode(json))
    }

    pub fn from_header_value(value: &str) -> AuthzResult<Self> {
        let bytes = STANDARD
            .decode(value.trim())
            .map_err(|err| AuthzError::MalformedRequest(format!("user info encoding: {err}")))?;
        serde_json::from_slice(&bytes)
            .map_err(|err| AuthzError::MalformedRequest(format!("user info payload: {err}")))
    }
}
