//! The persisted session slot record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The single credential-bearing record held by the session store.
///
/// Carries exactly one signed token string plus its expiry, so a stale slot
/// can be discarded on load without verifying the signature first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedToken {
    /// The signed session token.
    pub token: String,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
}

impl PersistedToken {
    /// Create a new slot record.
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// Whether the record is past its expiry. The boundary is exclusive: a
    /// record inspected at exactly `expires_at` is already expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}
