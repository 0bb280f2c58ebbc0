//! Session token creation and validation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use medboard_core::AppResult;
use medboard_core::config::AuthConfig;
use medboard_core::error::AppError;
use medboard_entity::Identity;

use super::claims::Claims;
use crate::directory::UserDirectory;
use crate::rbac::PermissionCatalog;

/// Result of a successful token issuance.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct IssuedToken {
    /// The signed token string.
    pub token: String,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies signed session tokens (HMAC-SHA256).
#[derive(Clone)]
pub struct TokenService {
    /// Signing key.
    encoding_key: EncodingKey,
    /// Verification key.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
    /// Session token lifetime in hours.
    session_ttl_hours: i64,
    /// Directory for the fresh profile lookup during verification.
    directory: Arc<dyn UserDirectory>,
    /// Permission derivation at issuance.
    catalog: Arc<PermissionCatalog>,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("session_ttl_hours", &self.session_ttl_hours)
            .finish()
    }
}

impl TokenService {
    /// Creates a new token service from auth configuration.
    pub fn new(
        config: &AuthConfig,
        directory: Arc<dyn UserDirectory>,
        catalog: Arc<PermissionCatalog>,
    ) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked explicitly after decoding so the boundary is
        // exact; library leeway would blur it.
        validation.validate_exp = false;

        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            session_ttl_hours: config.session_ttl_hours as i64,
            directory,
            catalog,
        }
    }

    /// Issues a signed token for the given identity.
    ///
    /// The embedded permission set is recomputed from the catalog on every
    /// issuance; a caller-supplied set is never forwarded into the token.
    pub fn issue(&self, identity: &Identity) -> AppResult<IssuedToken> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::hours(self.session_ttl_hours);

        let claims = Claims::new(
            identity.id,
            identity.role,
            self.catalog.permissions_for(identity.role),
            now,
            expires_at,
        );

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign session token: {e}")))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verifies a token string and reconstructs the identity.
    ///
    /// Checks, in order: signature integrity, expiry (exclusive boundary),
    /// then a fresh directory lookup of the mutable profile fields so stale
    /// names and departments do not survive for the full token lifetime.
    /// Role and permission snapshot come from the verified claims.
    pub async fn verify(&self, token: &str) -> AppResult<Identity> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::token_tampered("Token signature mismatch")
                }
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::token_expired("Token is past its expiry")
                }
                _ => AppError::token_tampered(format!("Malformed token: {e}")),
            }
        })?;
        let claims = data.claims;

        if claims.is_expired_at(Utc::now()) {
            return Err(AppError::token_expired("Token is past its expiry"));
        }

        let record = self
            .directory
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| {
                AppError::unknown_subject(format!("No directory entry for subject {}", claims.sub))
            })?;

        Ok(Identity {
            id: claims.sub,
            display_name: record.display_name,
            email: record.email,
            role: claims.role,
            department: record.department,
            permissions: claims.permission_set(),
            persona: record.persona,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::MemoryDirectory;
    use crate::password::PasswordHasher;
    use medboard_entity::{Permission, Role};

    fn service_with_ttl(hours: u64) -> TokenService {
        let hasher = PasswordHasher::with_params(16, 1, 1).unwrap();
        let directory = Arc::new(MemoryDirectory::seeded(&hasher).unwrap());
        let config = AuthConfig {
            jwt_secret: "unit-test-secret".to_string(),
            session_ttl_hours: hours,
            ..AuthConfig::default()
        };
        TokenService::new(&config, directory, Arc::new(PermissionCatalog::new()))
    }

    async fn admin_identity(service: &TokenService) -> Identity {
        let record = service
            .directory
            .find_by_email("admin@nmc.ae")
            .await
            .unwrap()
            .unwrap();
        let catalog = PermissionCatalog::new();
        Identity {
            id: record.id,
            display_name: record.display_name,
            email: record.email,
            role: Role::Admin,
            department: record.department,
            permissions: catalog.permissions_for(Role::Admin),
            persona: record.persona,
        }
    }

    #[tokio::test]
    async fn test_round_trip_preserves_id_role_and_permissions() {
        let service = service_with_ttl(24);
        let identity = admin_identity(&service).await;
        let issued = service.issue(&identity).unwrap();
        let verified = service.verify(&issued.token).await.unwrap();
        assert_eq!(verified.id, identity.id);
        assert_eq!(verified.role, identity.role);
        assert_eq!(verified.permissions, identity.permissions);
    }

    #[tokio::test]
    async fn test_tampered_token_is_rejected_before_expiry() {
        let service = service_with_ttl(24);
        let identity = admin_identity(&service).await;
        let issued = service.issue(&identity).unwrap();
        let mut tampered = issued.token.clone();
        // Flip a character inside the signature segment.
        let flipped = if tampered.ends_with('A') { 'B' } else { 'A' };
        tampered.pop();
        tampered.push(flipped);
        let err = service.verify(&tampered).await.unwrap_err();
        assert_eq!(err.kind, medboard_core::error::ErrorKind::TokenTampered);
    }

    #[tokio::test]
    async fn test_zero_ttl_token_is_expired_immediately() {
        let service = service_with_ttl(0);
        let identity = admin_identity(&service).await;
        let issued = service.issue(&identity).unwrap();
        let err = service.verify(&issued.token).await.unwrap_err();
        assert_eq!(err.kind, medboard_core::error::ErrorKind::TokenExpired);
    }

    #[tokio::test]
    async fn test_vanished_subject_is_rejected() {
        let service = service_with_ttl(24);
        let mut identity = admin_identity(&service).await;
        identity.id = uuid::Uuid::new_v4();
        let issued = service.issue(&identity).unwrap();
        let err = service.verify(&issued.token).await.unwrap_err();
        assert_eq!(err.kind, medboard_core::error::ErrorKind::UnknownSubject);
    }

    #[tokio::test]
    async fn test_permissions_are_recomputed_at_issuance() {
        let service = service_with_ttl(24);
        let mut identity = admin_identity(&service).await;
        // A caller-inflated permission set must not survive into the token.
        identity.role = Role::Guest;
        identity.permissions = Permission::ALL.into_iter().collect();
        let issued = service.issue(&identity).unwrap();
        let verified = service.verify(&issued.token).await.unwrap();
        assert_eq!(
            verified.permissions,
            std::collections::HashSet::from([Permission::ViewDashboard])
        );
    }

    #[tokio::test]
    async fn test_garbage_token_is_tampered() {
        let service = service_with_ttl(24);
        let err = service.verify("not.a.token").await.unwrap_err();
        assert_eq!(err.kind, medboard_core::error::ErrorKind::TokenTampered);
    }
}
