//! File-backed persistence of the single session slot.

use std::path::PathBuf;

use tokio::fs;
use tracing::{debug, warn};

use medboard_core::AppResult;
use medboard_core::config::StoreConfig;
use medboard_entity::PersistedToken;

/// Durable-but-local persistence of the current session token.
///
/// Exactly one slot: saving replaces any previous record. Only the session
/// manager writes or clears the slot; everything else reads derived
/// in-memory state.
#[derive(Debug, Clone)]
pub struct SessionStore {
    /// Location of the slot file.
    path: PathBuf,
}

impl SessionStore {
    /// Creates a store over the configured slot path.
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            path: PathBuf::from(&config.path),
        }
    }

    /// Persists the record, replacing any previous one atomically.
    pub async fn save(&self, record: &PersistedToken) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_vec_pretty(record)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &json).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600)).await?;
        }

        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Reads the slot. A missing, unreadable, or already-expired record
    /// resolves to `None` (clearing the slot in the latter two cases).
    pub async fn load(&self) -> AppResult<Option<PersistedToken>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record: PersistedToken = match serde_json::from_slice(&bytes) {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "discarding unreadable session slot");
                self.clear().await?;
                return Ok(None);
            }
        };

        if record.is_expired() {
            debug!("discarding expired session slot");
            self.clear().await?;
            return Ok(None);
        }

        Ok(Some(record))
    }

    /// Removes the slot. Clearing an already-empty slot is a no-op.
    pub async fn clear(&self) -> AppResult<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
