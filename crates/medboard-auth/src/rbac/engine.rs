//! Authorization decisions over the current identity.

use serde::{Deserialize, Serialize};

use medboard_entity::{Identity, Permission, Role};

/// How a policy's required permissions are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// At least one required permission must be held.
    Any,
    /// Every required permission must be held.
    All,
}

/// A declarative access requirement checked by collaborators.
///
/// Allowed roles are always combined with OR; required permissions follow
/// the [`MatchMode`]. When both sets are supplied, both checks must pass.
/// An empty policy authorizes unconditionally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessPolicy {
    /// Roles that may pass (OR semantics). Empty means any role.
    pub allowed_roles: Vec<Role>,
    /// Permissions that must be held per `match_mode`. Empty means none.
    pub required_permissions: Vec<Permission>,
    /// Combination mode for `required_permissions`.
    pub match_mode: MatchMode,
}

impl AccessPolicy {
    /// Creates a policy from explicit parts.
    pub fn new(
        allowed_roles: Vec<Role>,
        required_permissions: Vec<Permission>,
        match_mode: MatchMode,
    ) -> Self {
        Self {
            allowed_roles,
            required_permissions,
            match_mode,
        }
    }

    /// A policy with no requirements; authorizes unconditionally.
    pub fn unrestricted() -> Self {
        Self::new(Vec::new(), Vec::new(), MatchMode::All)
    }

    /// A role-only policy.
    pub fn for_roles(allowed_roles: impl Into<Vec<Role>>) -> Self {
        Self::new(allowed_roles.into(), Vec::new(), MatchMode::All)
    }

    /// A permission-only policy.
    pub fn for_permissions(
        required_permissions: impl Into<Vec<Permission>>,
        match_mode: MatchMode,
    ) -> Self {
        Self::new(Vec::new(), required_permissions.into(), match_mode)
    }

    /// Whether the policy carries no requirements at all.
    pub fn is_empty(&self) -> bool {
        self.allowed_roles.is_empty() && self.required_permissions.is_empty()
    }
}

/// Evaluates role and permission membership for the current identity.
///
/// Pure decision logic: denial is a `false` return consumed by the
/// collaborator's own fallback rendering, never an error.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationEngine;

impl AuthorizationEngine {
    /// Creates a new engine.
    pub fn new() -> Self {
        Self
    }

    /// Exact role match; `false` when unauthenticated.
    pub fn has_role(&self, identity: Option<&Identity>, role: Role) -> bool {
        identity.map(|i| i.role == role).unwrap_or(false)
    }

    /// Permission membership; `false` when unauthenticated.
    pub fn has_permission(&self, identity: Option<&Identity>, permission: Permission) -> bool {
        identity.map(|i| i.has_permission(permission)).unwrap_or(false)
    }

    /// Evaluates a full access policy against the identity.
    pub fn authorize(&self, identity: Option<&Identity>, policy: &AccessPolicy) -> bool {
        if policy.is_empty() {
            return true;
        }

        let Some(identity) = identity else {
            return false;
        };

        if !policy.allowed_roles.is_empty() && !policy.allowed_roles.contains(&identity.role) {
            return false;
        }

        if !policy.required_permissions.is_empty() {
            let satisfied = match policy.match_mode {
                MatchMode::Any => policy
                    .required_permissions
                    .iter()
                    .any(|p| identity.has_permission(*p)),
                MatchMode::All => policy
                    .required_permissions
                    .iter()
                    .all(|p| identity.has_permission(*p)),
            };
            if !satisfied {
                return false;
            }
        }

        true
    }
}
