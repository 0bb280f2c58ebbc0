//! Claims payload embedded in every session token.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use medboard_entity::{Permission, Role};

/// Claims payload carried by a signed session token.
///
/// The permission snapshot is fixed at issuance from the catalog; the
/// verifier trusts it only because the signature covers it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the user ID.
    pub sub: Uuid,
    /// Role at the time of issuance.
    pub role: Role,
    /// Permission snapshot at the time of issuance.
    pub perms: Vec<Permission>,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Builds a claims payload. The permission set is sorted so the encoded
    /// claim bytes are stable for a given identity and instant.
    pub fn new(
        sub: Uuid,
        role: Role,
        permissions: HashSet<Permission>,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let mut perms: Vec<Permission> = permissions.into_iter().collect();
        perms.sort();
        Self {
            sub,
            role,
            perms,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }

    /// Whether the token is expired at `now`. The boundary is exclusive:
    /// a token inspected at exactly `exp` is already expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Whether the token is expired right now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Remaining validity in seconds (0 if expired).
    pub fn remaining_ttl_seconds(&self) -> u64 {
        let remaining = self.exp - Utc::now().timestamp();
        if remaining > 0 { remaining as u64 } else { 0 }
    }

    /// The permission snapshot as a set.
    pub fn permission_set(&self) -> HashSet<Permission> {
        self.perms.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_expiring_at(expires_at: DateTime<Utc>) -> Claims {
        Claims::new(
            Uuid::new_v4(),
            Role::Guest,
            HashSet::from([Permission::ViewDashboard]),
            expires_at - chrono::Duration::hours(24),
            expires_at,
        )
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let exp = Utc::now() + chrono::Duration::hours(1);
        let claims = claims_expiring_at(exp);
        assert!(!claims.is_expired_at(exp - chrono::Duration::seconds(1)));
        assert!(claims.is_expired_at(exp));
        assert!(claims.is_expired_at(exp + chrono::Duration::seconds(1)));
    }

    #[test]
    fn test_permission_snapshot_is_sorted() {
        let claims = Claims::new(
            Uuid::new_v4(),
            Role::Admin,
            Permission::ALL.into_iter().collect(),
            Utc::now(),
            Utc::now() + chrono::Duration::hours(24),
        );
        let mut sorted = claims.perms.clone();
        sorted.sort();
        assert_eq!(claims.perms, sorted);
    }
}
