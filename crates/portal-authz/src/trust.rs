//! Service-to-service origin trust.
//!
//! # Purpose
//! Checks the origin a calling service asserts (via
//! [`crate::ORIGIN_SERVICE_HEADER`]) against the services a policy trusts.
//! The assertion is not authenticated; it narrows which callers may present
//! a credential at all and runs before any credential is decoded.
use crate::{AuthzError, AuthzResult, Service};
use std::collections::BTreeSet;

/// Validate an asserted origin against a trusted-service allow-list.
///
/// # Errors
/// - [`AuthzError::MalformedRequest`] if services are required and the
///   origin is absent or blank.
/// - [`AuthzError::UntrustedOrigin`] if no trusted service matches,
///   ignoring case.
pub fn validate_origin(
    asserted_origin: Option<&str>,
    trusted_services: &BTreeSet<Service>,
) -> AuthzResult<()> {
    if trusted_services.is_empty() {
        return Ok(());
    }
    let origin = asserted_origin
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .ok_or_else(|| {
            AuthzError::MalformedRequest("origin service cannot be null or empty".to_string())
        })?;
    if trusted_services.iter().any(|service| service.matches(origin)) {
        Ok(())
    } else {
        Err(AuthzError::UntrustedOrigin(origin.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trusted(services: &[Service]) -> BTreeSet<Service> {
        services.iter().copied().collect()
    }

    #[test]
    fn empty_allow_list_skips_validation() {
        assert!(validate_origin(None, &BTreeSet::new()).is_ok());
        assert!(validate_origin(Some("anything"), &BTreeSet::new()).is_ok());
    }

    #[test]
    fn missing_or_blank_origin_is_malformed() {
        let services = trusted(&[Service::BillingSvc]);
        for origin in [None, Some(""), Some("   ")] {
            let err = validate_origin(origin, &services).expect_err("malformed");
            assert!(matches!(err, AuthzError::MalformedRequest(_)));
        }
    }

    #[test]
    fn unknown_origin_is_untrusted() {
        let services = trusted(&[Service::BillingSvc]);
        let err = validate_origin(Some("reporting"), &services).expect_err("untrusted");
        assert!(matches!(err, AuthzError::UntrustedOrigin(origin) if origin == "reporting"));
    }

    #[test]
    fn origin_match_ignores_case() {
        let services = trusted(&[Service::BillingSvc, Service::Gateway]);
        assert!(validate_origin(Some("BILLING_SVC"), &services).is_ok());
        assert!(validate_origin(Some("Gateway"), &services).is_ok());
    }
}
