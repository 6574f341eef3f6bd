//! Policy declarations, scope resolution, and the load-time registry.
//!
//! # Purpose
//! Declarations are attached to a resource and/or one of its operations.
//! Resolution merges the two layers into the effective
//! [`AuthorizationPolicy`] for a request target.
//!
//! # Key invariants
//! - Roles, modules, and services fall back to the resource layer
//!   independently, and only when the operation's own set is empty. A
//!   non-empty operation set replaces the resource set; it is never unioned.
//! - `is_public` is true if the operation says so, otherwise the resource
//!   layer decides.
//! - A target with no declaration at either scope resolves to the empty,
//!   non-public policy: a valid credential is still required.
//! - A built [`PolicyRegistry`] is immutable. Reconfiguration builds a new one.
//!
//! # Examples
//! ```rust
//! use portal_authz::{OperationTarget, PolicyDeclaration, PolicyRegistry, Role};
//!
//! let registry = PolicyRegistry::builder()
//!     .resource("reports", PolicyDeclaration::default().with_roles([Role::Viewer]))
//!     .operation(
//!         OperationTarget::new("reports", "export"),
//!         PolicyDeclaration::default().with_roles([Role::Admin]),
//!     )
//!     .build();
//!
//! let export = registry.resolve(&OperationTarget::new("reports", "export"));
//! assert!(export.required_roles().contains(&Role::Admin));
//! assert!(!export.required_roles().contains(&Role::Viewer));
//! ```
use crate::{Module, OperationTarget, ResourceName, Role, Service};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Declaration attached to one scope; every field defaults to empty/false.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyDeclaration {
    pub roles: BTreeSet<Role>,
    pub modules: BTreeSet<Module>,
    pub services: BTreeSet<Service>,
    #[serde(rename = "public", alias = "is_public")]
    pub is_public: bool,
}

impl PolicyDeclaration {
    pub fn public() -> Self {
        Self {
            is_public: true,
            ..Self::default()
        }
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles.extend(roles);
        self
    }

    pub fn with_modules(mut self, modules: impl IntoIterator<Item = Module>) -> Self {
        self.modules.extend(modules);
        self
    }

    pub fn with_services(mut self, services: impl IntoIterator<Item = Service>) -> Self {
        self.services.extend(services);
        self
    }
}

/// Effective policy for one request target after scope resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationPolicy {
    required_roles: BTreeSet<Role>,
    required_modules: BTreeSet<Module>,
    trusted_services: BTreeSet<Service>,
    is_public: bool,
}

impl AuthorizationPolicy {
    pub fn new(
        required_roles: BTreeSet<Role>,
        required_modules: BTreeSet<Module>,
        trusted_services: BTreeSet<Service>,
        is_public: bool,
    ) -> Self {
        Self {
            required_roles,
            required_modules,
            trusted_services,
            is_public,
        }
    }

    /// Policy that admits any caller without a credential.
    pub fn public() -> Self {
        Self {
            is_public: true,
            ..Self::default()
        }
    }

    pub fn required_roles(&self) -> &BTreeSet<Role> {
        &self.required_roles
    }

    pub fn required_modules(&self) -> &BTreeSet<Module> {
        &self.required_modules
    }

    pub fn trusted_services(&self) -> &BTreeSet<Service> {
        &self.trusted_services
    }

    pub fn is_public(&self) -> bool {
        self.is_public
    }
}

impl From<&PolicyDeclaration> for AuthorizationPolicy {
    fn from(declaration: &PolicyDeclaration) -> Self {
        Self::new(
            declaration.roles.clone(),
            declaration.modules.clone(),
            declaration.services.clone(),
            declaration.is_public,
        )
    }
}

/// Merge the operation layer over the resource layer.
///
/// Each set falls back on its own; `None` at both scopes yields the default
/// (non-public, no requirements) policy.
pub fn resolve_layers(
    operation: Option<&PolicyDeclaration>,
    resource: Option<&PolicyDeclaration>,
) -> AuthorizationPolicy {
    fn pick<T: Ord + Clone>(
        operation: Option<&BTreeSet<T>>,
        resource: Option<&BTreeSet<T>>,
    ) -> BTreeSet<T> {
        operation
            .filter(|values| !values.is_empty())
            .or(resource)
            .cloned()
            .unwrap_or_default()
    }

    let is_public = match operation {
        Some(declaration) if declaration.is_public => true,
        _ => resource.is_some_and(|declaration| declaration.is_public),
    };

    AuthorizationPolicy::new(
        pick(operation.map(|d| &d.roles), resource.map(|d| &d.roles)),
        pick(operation.map(|d| &d.modules), resource.map(|d| &d.modules)),
        pick(operation.map(|d| &d.services), resource.map(|d| &d.services)),
        is_public,
    )
}

/// Immutable lookup table from targets to their declarations.
#[derive(Debug, Clone, Default)]
pub struct PolicyRegistry {
    resources: HashMap<ResourceName, PolicyDeclaration>,
    operations: HashMap<OperationTarget, PolicyDeclaration>,
}

impl PolicyRegistry {
    pub fn builder() -> PolicyRegistryBuilder {
        PolicyRegistryBuilder::default()
    }

    pub fn resolve(&self, target: &OperationTarget) -> AuthorizationPolicy {
        resolve_layers(
            self.operations.get(target),
            self.resources.get(target.resource()),
        )
    }

    /// True when either scope of `target` carries a declaration.
    pub fn is_declared(&self, target: &OperationTarget) -> bool {
        self.operations.contains_key(target) || self.resources.contains_key(target.resource())
    }

    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PolicyRegistryBuilder {
    resources: HashMap<ResourceName, PolicyDeclaration>,
    operations: HashMap<OperationTarget, PolicyDeclaration>,
}

impl PolicyRegistryBuilder {
    /// Declare (or replace) the resource-level policy.
    pub fn resource(mut self, resource: impl Into<String>, declaration: PolicyDeclaration) -> Self {
        self.resources
            .insert(ResourceName::new(resource), declaration);
        self
    }

    /// Declare (or replace) the operation-level policy.
    pub fn operation(mut self, target: OperationTarget, declaration: PolicyDeclaration) -> Self {
        self.operations.insert(target, declaration);
        self
    }

    /// Apply a policy document; its entries replace earlier declarations for
    /// the same scope.
    pub fn document(mut self, document: PolicyDocument) -> Self {
        for (resource, entry) in document.resources {
            if let Some(declaration) = entry.policy {
                self.resources
                    .insert(ResourceName::new(resource.clone()), declaration);
            }
            for (operation, declaration) in entry.operations {
                self.operations
                    .insert(OperationTarget::new(resource.clone(), operation), declaration);
            }
        }
        self
    }

    pub fn build(self) -> PolicyRegistry {
        PolicyRegistry {
            resources: self.resources,
            operations: self.operations,
        }
    }
}

/// Serialized form of a set of declarations, as loaded from a policy file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyDocument {
    pub resources: BTreeMap<String, ResourceDocument>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResourceDocument {
    pub policy: Option<PolicyDeclaration>,
    pub operations: BTreeMap<String, PolicyDeclaration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(values: &[Role]) -> BTreeSet<Role> {
        values.iter().copied().collect()
    }

    #[test]
    fn no_declaration_requires_credential_only() {
        let policy = resolve_layers(None, None);
        assert!(!policy.is_public());
        assert!(policy.required_roles().is_empty());
        assert!(policy.required_modules().is_empty());
        assert!(policy.trusted_services().is_empty());

        let registry = PolicyRegistry::default();
        let target = OperationTarget::new("reports", "list");
        assert_eq!(registry.resolve(&target), AuthorizationPolicy::default());
        assert!(!registry.is_declared(&target));
    }

    #[test]
    fn operation_roles_override_resource_roles() {
        let resource = PolicyDeclaration::default().with_roles([Role::Viewer, Role::Auditor]);
        let operation = PolicyDeclaration::default().with_roles([Role::Admin]);
        let policy = resolve_layers(Some(&operation), Some(&resource));
        assert_eq!(policy.required_roles(), &roles(&[Role::Admin]));
    }

    #[test]
    fn empty_operation_roles_fall_back_in_full() {
        let resource = PolicyDeclaration::default().with_roles([Role::Viewer, Role::Auditor]);
        let operation = PolicyDeclaration::default().with_modules([Module::Billing]);
        let policy = resolve_layers(Some(&operation), Some(&resource));
        assert_eq!(policy.required_roles(), &roles(&[Role::Viewer, Role::Auditor]));
        assert!(policy.required_modules().contains(&Module::Billing));
    }

    #[test]
    fn fields_fall_back_independently() {
        let resource = PolicyDeclaration::default()
            .with_roles([Role::Viewer])
            .with_modules([Module::Reporting])
            .with_services([Service::Gateway]);
        let operation = PolicyDeclaration::default()
            .with_modules([Module::Billing])
            .with_services([Service::BillingSvc]);
        let policy = resolve_layers(Some(&operation), Some(&resource));
        assert_eq!(policy.required_roles(), &roles(&[Role::Viewer]));
        assert_eq!(
            policy.required_modules().iter().copied().collect::<Vec<_>>(),
            vec![Module::Billing]
        );
        assert_eq!(
            policy.trusted_services().iter().copied().collect::<Vec<_>>(),
            vec![Service::BillingSvc]
        );
    }

    #[test]
    fn public_flag_resolution() {
        let public = PolicyDeclaration::public();
        let private = PolicyDeclaration::default().with_roles([Role::Admin]);

        assert!(resolve_layers(Some(&public), Some(&private)).is_public());
        assert!(resolve_layers(Some(&private), Some(&public)).is_public());
        assert!(resolve_layers(None, Some(&public)).is_public());
        assert!(!resolve_layers(Some(&private), None).is_public());
    }

    #[test]
    fn registry_resolves_resource_only_declarations() {
        let registry = PolicyRegistry::builder()
            .resource("billing", PolicyDeclaration::default().with_modules([Module::Billing]))
            .build();
        let target = OperationTarget::new("billing", "invoices");
        assert!(registry.is_declared(&target));
        let policy = registry.resolve(&target);
        assert!(policy.required_modules().contains(&Module::Billing));
        assert_eq!(registry.resource_count(), 1);
        assert_eq!(registry.operation_count(), 0);
    }

    #[test]
    fn document_replaces_code_declarations() {
        let document: PolicyDocument = serde_json::from_value(serde_json::json!({
            "resources": {
                "reports": {
                    "policy": { "roles": ["Viewer"] },
                    "operations": {
                        "export": { "roles": ["ADMIN"], "modules": ["reporting"] },
                        "health": { "public": true }
                    }
                }
            }
        }))
        .expect("document");

        let registry = PolicyRegistry::builder()
            .resource("reports", PolicyDeclaration::default().with_roles([Role::Manager]))
            .operation(
                OperationTarget::new("reports", "export"),
                PolicyDeclaration::public(),
            )
            .document(document)
            .build();

        let export = registry.resolve(&OperationTarget::new("reports", "export"));
        assert!(!export.is_public());
        assert_eq!(export.required_roles(), &roles(&[Role::Admin]));

        let list = registry.resolve(&OperationTarget::new("reports", "list"));
        assert_eq!(list.required_roles(), &roles(&[Role::Viewer]));

        assert!(registry.resolve(&OperationTarget::new("reports", "health")).is_public());
    }

    #[test]
    fn document_rejects_unknown_tags_and_fields() {
        let unknown_role = serde_json::from_value::<PolicyDocument>(serde_json::json!({
            "resources": { "reports": { "policy": { "roles": ["root"] } } }
        }));
        assert!(unknown_role.is_err());

        let unknown_field = serde_json::from_value::<PolicyDocument>(serde_json::json!({
            "resources": { "reports": { "policy": { "role": ["admin"] } } }
        }));
        assert!(unknown_field.is_err());
    }
}
