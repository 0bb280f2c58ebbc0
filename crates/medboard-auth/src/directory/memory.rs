//! In-memory user directory for single-node deployments.

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use medboard_core::AppResult;
use medboard_entity::UserRecord;

use super::provider::UserDirectory;
use super::seed::SEED_ACCOUNTS;
use crate::password::PasswordHasher;

/// An immutable in-memory directory keyed by lowercase email.
#[derive(Debug, Clone)]
pub struct MemoryDirectory {
    /// Lowercase email → record.
    by_email: HashMap<String, UserRecord>,
}

impl MemoryDirectory {
    /// Builds the directory from the built-in demo accounts, hashing every
    /// seed secret with the given hasher.
    pub fn seeded(hasher: &PasswordHasher) -> AppResult<Self> {
        let mut records = Vec::with_capacity(SEED_ACCOUNTS.len());
        for seed in SEED_ACCOUNTS {
            records.push(UserRecord {
                id: seed.id,
                email: seed.email.to_string(),
                password_hash: hasher.hash_secret(seed.secret)?,
                display_name: seed.display_name.to_string(),
                department: seed.department.to_string(),
                persona: seed.persona.to_string(),
                role_label: seed.role_label.to_string(),
            });
        }
        Ok(Self::from_records(records))
    }

    /// Builds a directory from explicit records.
    pub fn from_records(records: Vec<UserRecord>) -> Self {
        let by_email = records
            .into_iter()
            .map(|record| (record.email.to_ascii_lowercase(), record))
            .collect();
        Self { by_email }
    }
}

#[async_trait]
impl UserDirectory for MemoryDirectory {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        Ok(self.by_email.get(&email.to_ascii_lowercase()).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserRecord>> {
        Ok(self.by_email.values().find(|r| r.id == id).cloned())
    }
}
