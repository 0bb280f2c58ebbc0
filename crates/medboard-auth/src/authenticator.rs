//! Credential verification against the user directory.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::{info, warn};

use medboard_core::AppResult;
use medboard_core::config::AuthConfig;
use medboard_core::error::AppError;
use medboard_entity::{Credentials, Identity, Role};

use crate::directory::UserDirectory;
use crate::password::PasswordHasher;
use crate::rbac::PermissionCatalog;

/// The one message returned for every credential failure, so callers cannot
/// tell an unknown email from a wrong secret.
const INVALID_CREDENTIALS_MSG: &str = "Invalid email or secret";

/// Failed-attempt tracking for one email.
#[derive(Debug, Default)]
struct FailedAttempts {
    count: u32,
    locked_until: Option<DateTime<Utc>>,
}

/// Verifies a credential pair and produces a verdict.
///
/// The authenticator mutates nothing beyond its own failed-attempt counters;
/// what to do with a verdict is the caller's decision.
pub struct Authenticator {
    /// Directory lookups.
    directory: Arc<dyn UserDirectory>,
    /// Secret verification.
    hasher: PasswordHasher,
    /// Role → permission derivation.
    catalog: Arc<PermissionCatalog>,
    /// Per-email failed-attempt counters.
    attempts: DashMap<String, FailedAttempts>,
    /// Lockout policy.
    max_failed_attempts: u32,
    lockout_duration_minutes: u64,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("max_failed_attempts", &self.max_failed_attempts)
            .field("lockout_duration_minutes", &self.lockout_duration_minutes)
            .finish()
    }
}

impl Authenticator {
    /// Creates a new authenticator.
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        hasher: PasswordHasher,
        catalog: Arc<PermissionCatalog>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            directory,
            hasher,
            catalog,
            attempts: DashMap::new(),
            max_failed_attempts: config.max_failed_attempts,
            lockout_duration_minutes: config.lockout_duration_minutes,
        }
    }

    /// Verifies the credential pair and returns the resulting identity.
    ///
    /// Failure shape is constant: both an unknown email and a wrong secret
    /// yield the same `InvalidCredentials` error. A directory entry whose
    /// role label does not parse is given the guest role and its minimal
    /// permission set rather than rejected.
    pub async fn authenticate(&self, credentials: &Credentials) -> AppResult<Identity> {
        let email = credentials.email.trim().to_ascii_lowercase();

        self.check_lockout(&email)?;

        let Some(record) = self.directory.find_by_email(&email).await? else {
            self.record_failure(&email);
            return Err(AppError::invalid_credentials(INVALID_CREDENTIALS_MSG));
        };

        if !self
            .hasher
            .verify_secret(&credentials.secret, &record.password_hash)?
        {
            self.record_failure(&email);
            return Err(AppError::invalid_credentials(INVALID_CREDENTIALS_MSG));
        }

        self.attempts.remove(&email);

        let role = record.role_label.parse::<Role>().unwrap_or_else(|_| {
            warn!(
                email = %email,
                label = %record.role_label,
                "unrecognized role label, falling back to guest"
            );
            Role::Guest
        });

        let permissions = self.catalog.permissions_for(role);

        info!(user_id = %record.id, role = %role, "credentials verified");

        Ok(Identity {
            id: record.id,
            display_name: record.display_name,
            email: record.email,
            role,
            department: record.department,
            permissions,
            persona: record.persona,
        })
    }

    /// Rejects the attempt while the email is inside a lockout window.
    fn check_lockout(&self, email: &str) -> AppResult<()> {
        if let Some(entry) = self.attempts.get(email) {
            if let Some(until) = entry.locked_until {
                if Utc::now() < until {
                    return Err(AppError::account_locked(format!(
                        "Too many failed attempts. Try again after {}",
                        until.format("%H:%M:%S UTC")
                    )));
                }
            } else {
                return Ok(());
            }
        } else {
            return Ok(());
        }
        // The lockout window has passed; start over.
        self.attempts.remove(email);
        Ok(())
    }

    /// Increments the counter and arms the lockout at the threshold.
    fn record_failure(&self, email: &str) {
        let mut entry = self.attempts.entry(email.to_string()).or_default();
        entry.count += 1;
        if entry.count >= self.max_failed_attempts {
            let until = Utc::now() + chrono::Duration::minutes(self.lockout_duration_minutes as i64);
            entry.locked_until = Some(until);
            warn!(
                email = %email,
                attempts = entry.count,
                locked_until = %until,
                "account locked after repeated failed logins"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::MemoryDirectory;
    use medboard_entity::{Permission, UserRecord};
    use uuid::Uuid;

    fn light_hasher() -> PasswordHasher {
        PasswordHasher::with_params(16, 1, 1).unwrap()
    }

    fn authenticator() -> Authenticator {
        let hasher = light_hasher();
        let directory = Arc::new(MemoryDirectory::seeded(&hasher).unwrap());
        Authenticator::new(
            directory,
            hasher,
            Arc::new(PermissionCatalog::new()),
            &AuthConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_admin_login_yields_full_identity() {
        let auth = authenticator();
        let identity = auth
            .authenticate(&Credentials::new("admin@nmc.ae", "admin123"))
            .await
            .unwrap();
        assert_eq!(identity.role, Role::Admin);
        assert!(identity.has_permission(Permission::SystemAdmin));
    }

    #[tokio::test]
    async fn test_unknown_email_and_wrong_secret_look_identical() {
        let auth = authenticator();
        let unknown = auth
            .authenticate(&Credentials::new("nobody@nmc.ae", "whatever"))
            .await
            .unwrap_err();
        let wrong = auth
            .authenticate(&Credentials::new("guest@nmc.ae", "wrong"))
            .await
            .unwrap_err();
        assert_eq!(unknown.kind, wrong.kind);
        assert_eq!(unknown.message, wrong.message);
    }

    #[tokio::test]
    async fn test_unrecognized_role_falls_back_to_guest() {
        let hasher = light_hasher();
        let record = UserRecord {
            id: Uuid::new_v4(),
            email: "mystery@nmc.ae".to_string(),
            password_hash: hasher.hash_secret("pw").unwrap(),
            display_name: "Mystery".to_string(),
            department: "Unknown".to_string(),
            persona: "Mystery".to_string(),
            role_label: "superuser".to_string(),
        };
        let auth = Authenticator::new(
            Arc::new(MemoryDirectory::from_records(vec![record])),
            hasher,
            Arc::new(PermissionCatalog::new()),
            &AuthConfig::default(),
        );
        let identity = auth
            .authenticate(&Credentials::new("mystery@nmc.ae", "pw"))
            .await
            .unwrap();
        assert_eq!(identity.role, Role::Guest);
        assert_eq!(
            identity.permissions,
            std::collections::HashSet::from([Permission::ViewDashboard])
        );
    }

    #[tokio::test]
    async fn test_lockout_after_repeated_failures() {
        let auth = authenticator();
        for _ in 0..AuthConfig::default().max_failed_attempts {
            let err = auth
                .authenticate(&Credentials::new("guest@nmc.ae", "wrong"))
                .await
                .unwrap_err();
            assert_eq!(err.kind, medboard_core::error::ErrorKind::InvalidCredentials);
        }
        // The right secret no longer helps while the window is open.
        let err = auth
            .authenticate(&Credentials::new("guest@nmc.ae", "guest123"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, medboard_core::error::ErrorKind::AccountLocked);
    }

    #[tokio::test]
    async fn test_success_resets_the_counter() {
        let auth = authenticator();
        for _ in 0..3 {
            let _ = auth
                .authenticate(&Credentials::new("guest@nmc.ae", "wrong"))
                .await;
        }
        auth.authenticate(&Credentials::new("guest@nmc.ae", "guest123"))
            .await
            .unwrap();
        // Three more failures stay below the threshold again.
        for _ in 0..3 {
            let err = auth
                .authenticate(&Credentials::new("guest@nmc.ae", "wrong"))
                .await
                .unwrap_err();
            assert_eq!(err.kind, medboard_core::error::ErrorKind::InvalidCredentials);
        }
    }
}
