//! Capability tags used in policy declarations.
//!
//! # Purpose
//! Defines the closed sets of roles, modules, and calling services that an
//! operation can require.
//!
//! # Key invariants
//! - Canonical names are lowercase snake case.
//! - Parsing and matching ignore ASCII case, so `"Admin"` and `"ADMIN"` both
//!   name [`Role::Admin`].
//!
//! # Examples
//! ```rust
//! use portal_authz::{Role, Service};
//!
//! assert_eq!("ADMIN".parse::<Role>().ok(), Some(Role::Admin));
//! assert!(Service::BillingSvc.matches("Billing_Svc"));
//! ```
use crate::AuthzError;

// Each tag enum gets the same string surface: canonical name, case-insensitive
// parse, Display, and serde through the canonical name.
macro_rules! capability_tag {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[derive(serde::Serialize, serde::Deserialize)]
        #[serde(into = "String", try_from = "String")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            /// Case-insensitive comparison against a raw claim or header value.
            pub fn matches(self, value: &str) -> bool {
                self.as_str().eq_ignore_ascii_case(value.trim())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = AuthzError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|tag| tag.matches(value))
                    .ok_or_else(|| AuthzError::UnknownTag {
                        kind: $kind,
                        value: value.to_string(),
                    })
            }
        }

        impl From<$name> for String {
            fn from(tag: $name) -> Self {
                tag.as_str().to_string()
            }
        }

        impl TryFrom<String> for $name {
            type Error = AuthzError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

capability_tag!(Role, "role", {
    Admin => "admin",
    Manager => "manager",
    Operator => "operator",
    Auditor => "auditor",
    Viewer => "viewer",
});

capability_tag!(Module, "module", {
    Billing => "billing",
    Reporting => "reporting",
    Inventory => "inventory",
    Users => "users",
    Notifications => "notifications",
});

capability_tag!(Service, "service", {
    BillingSvc => "billing_svc",
    ReportingSvc => "reporting_svc",
    UsersSvc => "users_svc",
    NotificationSvc => "notification_svc",
    Gateway => "gateway",
});
