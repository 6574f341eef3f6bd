//! Claim extraction from pre-validated bearer credentials.
//!
//! # Purpose
//! Turns the payload of a bearer token into an [`Identity`]. The token has
//! already been verified by the identity provider integration; this module
//! only decodes it and never checks signatures.
//!
//! # Key invariants
//! - No credential at all is [`AuthzError::MissingCredential`].
//! - Any payload that does not decode to a JSON object is
//!   [`AuthzError::MalformedCredential`]; corrupt encoding and wrong shape
//!   are not distinguished.
//! - Absent claims never fail extraction: strings become `None`, arrays
//!   become empty.
//!
//! # Examples
//! ```rust
//! use base64::Engine;
//! use base64::engine::general_purpose::URL_SAFE_NO_PAD;
//! use portal_authz::{BearerCredential, ClaimExtractor, JwtClaimExtractor};
//!
//! let payload = URL_SAFE_NO_PAD.encode(r#"{"sub":"u-1","roles":["admin"]}"#);
//! let token = BearerCredential::new(format!("e30.{payload}.sig"));
//! let identity = JwtClaimExtractor::default().extract(Some(&token)).unwrap();
//! assert_eq!(identity.roles, vec!["admin".to_string()]);
//! ```
use crate::{AuthzError, AuthzResult, Identity};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Opaque bearer token as attached by the surrounding framework.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerCredential(String);

impl BearerCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Parse an `Authorization` header value; anything but a non-empty
    /// bearer token yields `None`.
    pub fn from_authorization(value: &str) -> Option<Self> {
        let (scheme, token) = value.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return None;
        }
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        Some(Self::new(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens must not end up in logs through `{:?}`.
impl std::fmt::Debug for BearerCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerCredential(<redacted>)")
    }
}

/// Claim names read for each identity field.
///
/// Array claims accept dotted paths (`realm_access.roles`) to reach nested
/// objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimMappings {
    pub subject_claim: String,
    pub username_claim: String,
    pub email_claim: String,
    pub given_name_claim: String,
    pub family_name_claim: String,
    pub roles_claim: String,
    pub groups_claim: String,
    pub modules_claim: String,
    pub attributes_claim: String,
}

impl Default for ClaimMappings {
    fn default() -> Self {
        Self {
            subject_claim: "sub".to_string(),
            username_claim: "preferred_username".to_string(),
            email_claim: "email".to_string(),
            given_name_claim: "given_name".to_string(),
            family_name_claim: "family_name".to_string(),
            roles_claim: "roles".to_string(),
            groups_claim: "groups".to_string(),
            modules_claim: "modules".to_string(),
            attributes_claim: "attributes".to_string(),
        }
    }
}

pub trait ClaimExtractor: Send + Sync {
    fn extract(&self, credential: Option<&BearerCredential>) -> AuthzResult<Identity>;
}

/// Extractor for compact JWS tokens (`header.payload.signature`).
#[derive(Debug, Clone, Default)]
pub struct JwtClaimExtractor {
    mappings: ClaimMappings,
}

impl JwtClaimExtractor {
    pub fn new(mappings: ClaimMappings) -> Self {
        Self { mappings }
    }

    pub fn mappings(&self) -> &ClaimMappings {
        &self.mappings
    }

    pub fn identity_from_claims(&self, claims: &Map<String, Value>) -> Identity {
        let mappings = &self.mappings;
        Identity {
            subject_id: string_claim(claims, &mappings.subject_claim),
            username: string_claim(claims, &mappings.username_claim),
            first_name: string_claim(claims, &mappings.given_name_claim),
            last_name: string_claim(claims, &mappings.family_name_claim),
            email: string_claim(claims, &mappings.email_claim),
            roles: array_claim(claims, &mappings.roles_claim),
            groups: array_claim(claims, &mappings.groups_claim),
            modules: array_claim(claims, &mappings.modules_claim),
            attributes: attributes_claim(claims, &mappings.attributes_claim),
        }
    }
}

impl ClaimExtractor for JwtClaimExtractor {
    fn extract(&self, credential: Option<&BearerCredential>) -> AuthzResult<Identity> {
        let credential = credential.ok_or(AuthzError::MissingCredential)?;
        let claims = decode_payload(credential.as_str())?;
        Ok(self.identity_from_claims(&claims))
    }
}

fn decode_payload(token: &str) -> AuthzResult<Map<String, Value>> {
    let mut parts = token.split('.');
    let _header = parts.next();
    let payload = parts
        .next()
        .ok_or_else(|| AuthzError::MalformedCredential("token format".to_string()))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|_| AuthzError::MalformedCredential("token payload".to_string()))?;
    match serde_json::from_slice(&bytes) {
        Ok(Value::Object(claims)) => Ok(claims),
        Ok(_) => Err(AuthzError::MalformedCredential(
            "token payload is not an object".to_string(),
        )),
        Err(err) => Err(AuthzError::MalformedCredential(format!(
            "token payload: {err}"
        ))),
    }
}

fn lookup<'a>(claims: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    // An exact key wins over a dotted path so claims like `urn.x` still resolve.
    if let Some(value) = claims.get(path) {
        return Some(value);
    }
    let mut segments = path.split('.');
    let mut current = claims.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

fn string_claim(claims: &Map<String, Value>, name: &str) -> Option<String> {
    // Only accept string-valued claims; other types are ignored.
    lookup(claims, name)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn array_claim(claims: &Map<String, Value>, name: &str) -> Vec<String> {
    match lookup(claims, name) {
        Some(Value::Array(items)) => items.iter().filter_map(claim_text).collect(),
        Some(Value::String(value)) => vec![value.clone()],
        _ => Vec::new(),
    }
}

fn claim_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn attributes_claim(claims: &Map<String, Value>, name: &str) -> BTreeMap<String, Vec<String>> {
    let Some(Value::Object(entries)) = lookup(claims, name) else {
        return BTreeMap::new();
    };
    entries
        .iter()
        .map(|(key, value)| {
            let values: Vec<String> = match value {
                Value::Array(items) => items.iter().filter_map(claim_text).collect(),
                other => claim_text(other).into_iter().collect(),
            };
            (key.clone(), values)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token_for(claims: Value) -> BearerCredential {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        BearerCredential::new(format!("{header}.{payload}.signature"))
    }

    #[test]
    fn missing_credential() {
        let err = JwtClaimExtractor::default()
            .extract(None)
            .expect_err("no credential");
        assert!(matches!(err, AuthzError::MissingCredential));
    }

    #[test]
    fn extracts_standard_claims() {
        let token = token_for(json!({
            "sub": "f3a1",
            "preferred_username": "alice",
            "email": "alice@example.com",
            "given_name": "Alice",
            "family_name": "Liddell",
            "roles": ["Admin", "viewer"],
            "groups": ["/finance"],
            "modules": ["billing"],
            "iss": "https://sso.example.com/realms/portal",
            "exp": 1_900_000_000
        }));
        let identity = JwtClaimExtractor::default()
            .extract(Some(&token))
            .expect("identity");

        assert_eq!(identity.subject_id.as_deref(), Some("f3a1"));
        assert_eq!(identity.username.as_deref(), Some("alice"));
        assert_eq!(identity.email.as_deref(), Some("alice@example.com"));
        assert_eq!(identity.first_name.as_deref(), Some("Alice"));
        assert_eq!(identity.last_name.as_deref(), Some("Liddell"));
        assert_eq!(identity.roles, vec!["Admin", "viewer"]);
        assert_eq!(identity.groups, vec!["/finance"]);
        assert_eq!(identity.modules, vec!["billing"]);
        assert!(identity.attributes.is_empty());
    }

    #[test]
    fn absent_claims_are_empty_not_errors() {
        let identity = JwtClaimExtractor::default()
            .extract(Some(&token_for(json!({}))))
            .expect("identity");
        assert_eq!(identity, Identity::default());
    }

    #[test]
    fn non_string_scalars_are_ignored_for_string_claims() {
        let identity = JwtClaimExtractor::default()
            .extract(Some(&token_for(json!({ "sub": 42, "email": null }))))
            .expect("identity");
        assert!(identity.subject_id.is_none());
        assert!(identity.email.is_none());
    }

    #[test]
    fn array_claims_keep_order_and_render_scalars() {
        let identity = JwtClaimExtractor::default()
            .extract(Some(&token_for(json!({
                "roles": ["viewer", 7, null, true, "admin"],
                "groups": "/single"
            }))))
            .expect("identity");
        assert_eq!(identity.roles, vec!["viewer", "7", "true", "admin"]);
        assert_eq!(identity.groups, vec!["/single"]);
    }

    #[test]
    fn attributes_claim_is_mapped() {
        let identity = JwtClaimExtractor::default()
            .extract(Some(&token_for(json!({
                "attributes": { "region": ["eu", "us"], "tier": "gold", "flag": null }
            }))))
            .expect("identity");
        assert_eq!(identity.attributes["region"], vec!["eu", "us"]);
        assert_eq!(identity.attributes["tier"], vec!["gold"]);
        assert!(identity.attributes["flag"].is_empty());
    }

    #[test]
    fn nested_claim_paths() {
        let extractor = JwtClaimExtractor::new(ClaimMappings {
            roles_claim: "realm_access.roles".to_string(),
            ..ClaimMappings::default()
        });
        let identity = extractor
            .extract(Some(&token_for(json!({
                "realm_access": { "roles": ["operator"] }
            }))))
            .expect("identity");
        assert_eq!(identity.roles, vec!["operator"]);

        let identity = extractor
            .extract(Some(&token_for(json!({ "roles": ["ignored"] }))))
            .expect("identity");
        assert!(identity.roles.is_empty());
    }

    #[test]
    fn malformed_payloads() {
        let extractor = JwtClaimExtractor::default();
        let cases = [
            BearerCredential::new("no-dots"),
            BearerCredential::new("header.!!!not-base64!!!.sig"),
            BearerCredential::new(format!("h.{}.s", URL_SAFE_NO_PAD.encode("not json"))),
            BearerCredential::new(format!("h.{}.s", URL_SAFE_NO_PAD.encode("[\"a\"]"))),
        ];
        for credential in cases {
            let err = extractor
                .extract(Some(&credential))
                .expect_err("malformed credential");
            assert!(matches!(err, AuthzError::MalformedCredential(_)));
        }
    }

    #[test]
    fn padded_payload_is_accepted() {
        let payload = base64::engine::general_purpose::URL_SAFE.encode(r#"{"sub":"a"}"#);
        assert!(payload.ends_with('='));
        let identity = JwtClaimExtractor::default()
            .extract(Some(&BearerCredential::new(format!("h.{payload}.s"))))
            .expect("identity");
        assert_eq!(identity.subject_id.as_deref(), Some("a"));
    }

    #[test]
    fn bearer_header_parsing() {
        let credential = BearerCredential::from_authorization("Bearer abc.def.ghi").expect("bearer");
        assert_eq!(credential.as_str(), "abc.def.ghi");
        assert!(BearerCredential::from_authorization("bearer  xyz ").is_some());
        assert!(BearerCredential::from_authorization("Basic dXNlcjpwYXNz").is_none());
        assert!(BearerCredential::from_authorization("Bearer ").is_none());
        assert!(BearerCredential::from_authorization("Bearer").is_none());
        assert_eq!(format!("{credential:?}"), "BearerCredential(<redacted>)");
    }
}
