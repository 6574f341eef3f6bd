use crate::{AuthorizationPolicy, AuthzError, Identity};
use std::collections::BTreeSet;

#[derive(Debug)]
pub enum AuthorizationDecision {
    Allow(Identity),
    Deny(AuthzError),
}

impl AuthorizationDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AuthorizationDecision::Allow(_))
    }
}

/// True when `required` is empty or any held value names a required tag.
///
/// Held values are trimmed and compared ignoring ASCII case, the same rule
/// the tag types apply in their own `matches`.
pub fn matches_any<T>(held: &[String], required: &BTreeSet<T>, name: impl Fn(&T) -> &str) -> bool {
    if required.is_empty() {
        return true;
    }
    required.iter().any(|tag| {
        held.iter()
            .any(|value| name(tag).eq_ignore_ascii_case(value.trim()))
    })
}

pub fn evaluate(identity: Identity, policy: &AuthorizationPolicy) -> AuthorizationDecision {
    if policy.is_public() {
        return AuthorizationDecision::Allow(identity);
    }
    let has_role = matches_any(&identity.roles, policy.required_roles(), |role| role.as_str());
    let has_module = matches_any(&identity.modules, policy.required_modules(), |module| {
        module.as_str()
    });
    tracing::debug!(
        user = identity.display_name(),
        has_role,
        has_module,
        "evaluated role and module requirements"
    );
    if has_role && has_module {
        AuthorizationDecision::Allow(identity)
    } else {
        AuthorizationDecision::Deny(AuthzError::InsufficientPrivilege)
    }
}
