//! Directory lookup trait.

use async_trait::async_trait;
use uuid::Uuid;

use medboard_core::AppResult;
use medboard_entity::UserRecord;

/// Read-only lookup into the user directory.
///
/// Lookups may suspend (a backing directory can live behind a network), so
/// the trait is async even though the built-in implementation is in-memory.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Finds a record by login email. The email is matched case-insensitively.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;

    /// Finds a record by its stable identifier.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserRecord>>;
}
