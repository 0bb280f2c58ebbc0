//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use uuid::Uuid;

use medboard_auth::Authenticator;
use medboard_auth::directory::{MemoryDirectory, UserDirectory};
use medboard_auth::password::PasswordHasher;
use medboard_auth::rbac::PermissionCatalog;
use medboard_auth::session::{SessionManager, SessionStore};
use medboard_auth::token::TokenService;
use medboard_core::config::{AuthConfig, SessionConfig, StoreConfig};
use medboard_entity::AuthState;

/// A unique slot path per test so runs never interfere.
pub fn temp_slot_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("medboard-it-{}", Uuid::new_v4()))
        .join("session.json")
}

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "integration-test-secret".to_string(),
        ..AuthConfig::default()
    }
}

pub fn session_config() -> SessionConfig {
    SessionConfig::default()
}

pub fn store_config(path: &Path) -> StoreConfig {
    StoreConfig {
        path: path.display().to_string(),
    }
}

/// Light Argon2 parameters keep the seeded directory fast to build.
pub fn light_hasher() -> PasswordHasher {
    PasswordHasher::with_params(16, 1, 1).expect("argon2 params")
}

pub fn seeded_directory() -> Arc<MemoryDirectory> {
    Arc::new(MemoryDirectory::seeded(&light_hasher()).expect("seed directory"))
}

pub fn build_manager(path: &Path) -> SessionManager {
    build_manager_with(path, seeded_directory())
}

pub fn build_manager_with(path: &Path, directory: Arc<dyn UserDirectory>) -> SessionManager {
    let catalog = Arc::new(PermissionCatalog::new());
    let auth_cfg = auth_config();
    let authenticator = Authenticator::new(
        Arc::clone(&directory),
        light_hasher(),
        Arc::clone(&catalog),
        &auth_cfg,
    );
    let tokens = TokenService::new(&auth_cfg, directory, catalog);
    let store = SessionStore::new(&store_config(path));
    SessionManager::new(authenticator, tokens, store, &auth_cfg, &session_config())
}

/// A second store handle over the same path, for inspecting the slot.
pub fn inspect_store(path: &Path) -> SessionStore {
    SessionStore::new(&store_config(path))
}

/// Lets spawned tasks run without advancing the paused clock.
pub async fn settle() {
    for _ in 0..64 {
        tokio::task::yield_now().await;
    }
}

/// Blocks until the manager lands in `Unauthenticated`. Under a paused
/// clock the runtime auto-advances through any pending timers.
pub async fn wait_until_unauthenticated(manager: &SessionManager) {
    let mut rx = manager.subscribe();
    loop {
        if matches!(&*rx.borrow(), AuthState::Unauthenticated) {
            return;
        }
        rx.changed().await.expect("state channel closed");
    }
}
