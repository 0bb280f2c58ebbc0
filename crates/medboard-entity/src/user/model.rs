//! Directory records and the authenticated identity.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::Role;
use crate::permission::Permission;

/// A directory entry for a registered user.
///
/// The role is stored as its raw label so that entries seeded from external
/// configuration survive unknown values; the label is parsed (with a guest
/// fallback) at authentication time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique user identifier.
    pub id: Uuid,
    /// Login email, stored lowercase.
    pub email: String,
    /// Argon2id hash of the login secret.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Human-readable display name.
    pub display_name: String,
    /// Department or unit.
    pub department: String,
    /// Display label for the persona (e.g. "Attending Physician").
    pub persona: String,
    /// Raw role label (parsed into [`Role`] during authentication).
    pub role_label: String,
}

/// The authenticated user's identity, held for the life of a session.
///
/// The permission set is derived from the role via the catalog at
/// authentication or token-issuance time; it is never stored independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Unique user identifier.
    pub id: Uuid,
    /// Human-readable display name.
    pub display_name: String,
    /// Login email.
    pub email: String,
    /// Resolved role.
    pub role: Role,
    /// Department or unit.
    pub department: String,
    /// Derived permission set.
    pub permissions: HashSet<Permission>,
    /// Display label for the persona.
    pub persona: String,
}

impl Identity {
    /// Membership test against the derived permission set.
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    /// Check if this identity has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// A seed account exposed read-only for onboarding and testing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoAccount {
    /// Login email.
    pub email: String,
    /// Plaintext login secret (demo accounts only).
    pub secret: String,
    /// Role label of the account.
    pub role_label: String,
}
