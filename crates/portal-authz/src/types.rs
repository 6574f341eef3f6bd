//! Identifiers for the operations a policy can be attached to.
//!
//! # Purpose
//! Names the two policy scopes: a resource (the enclosing group of
//! operations) and an operation within it.
//!
//! # How it fits
//! The policy registry is keyed by these types, and the HTTP host attaches an
//! [`OperationTarget`] to every guarded route.
//!
//! # Key invariants
//! - Names are compared exactly; callers pick one spelling per operation.
//! - `Display` renders targets as `resource.operation`.
//!
//! # Examples
//! ```rust
//! use portal_authz::OperationTarget;
//!
//! let target = OperationTarget::new("reports", "export");
//! assert_eq!(target.to_string(), "reports.export");
//! assert_eq!(target.resource().as_str(), "reports");
//! ```
//!
//! # Common pitfalls
//! - Registering a policy under one spelling and routing under another
//!   silently yields the empty (credential-only) policy.
/// Resource (enclosing scope) identifier.
///
/// # Example
/// ```rust
/// use portal_authz::ResourceName;
///
/// let resource = ResourceName::new("reports");
/// assert_eq!(resource.as_str(), "reports");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceName(String);

impl ResourceName {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Operation identifier, unique within its resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationName(String);

impl OperationName {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OperationName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fully qualified target of a request: an operation inside a resource.
///
/// # Invariants
/// - The resource part is what operation-level declarations fall back to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationTarget {
    resource: ResourceName,
    operation: OperationName,
}

impl OperationTarget {
    pub fn new(resource: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            resource: ResourceName::new(resource),
            operation: OperationName::new(operation),
        }
    }

    pub fn resource(&self) -> &ResourceName {
        &self.resource
    }

    pub fn operation(&self) -> &OperationName {
        &self.operation
    }
}

impl std::fmt::Display for OperationTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.resource, self.operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_constructors_and_display() {
        let resource = ResourceName::new("reports");
        let operation = OperationName::new("export");
        let target = OperationTarget::new("reports", "export");

        assert_eq!(resource.to_string(), "reports");
        assert_eq!(operation.as_str(), "export");
        assert_eq!(target.resource(), &resource);
        assert_eq!(target.operation(), &operation);
        assert_eq!(target.to_string(), "reports.export");
    }
}
