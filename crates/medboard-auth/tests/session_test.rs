//! Integration tests for session persistence and restore.

mod common;

use chrono::Utc;

use medboard_entity::{AuthState, Credentials, PersistedToken, Role};

#[tokio::test]
async fn test_restore_resumes_a_persisted_session() {
    let path = common::temp_slot_path();

    let first = common::build_manager(&path);
    let identity = first
        .login(&Credentials::new("dr.mansoor@nmc.ae", "doctor123"))
        .await
        .unwrap();

    // A fresh manager over the same slot stands in for a process restart.
    let second = common::build_manager(&path);
    let restored = second.restore().await.unwrap();

    assert_eq!(restored.id, identity.id);
    assert_eq!(restored.role, Role::AttendingPhysician);
    assert!(second.is_authenticated());
}

#[tokio::test]
async fn test_restore_with_empty_slot_is_unauthenticated() {
    let path = common::temp_slot_path();
    let manager = common::build_manager(&path);

    assert!(manager.restore().await.is_none());
    assert!(matches!(manager.state(), AuthState::Unauthenticated));
}

#[tokio::test]
async fn test_restore_rejects_a_tampered_slot_silently() {
    let path = common::temp_slot_path();
    let store = common::inspect_store(&path);
    store
        .save(&PersistedToken::new(
            "definitely.not.signed",
            Utc::now() + chrono::Duration::hours(2),
        ))
        .await
        .unwrap();

    let manager = common::build_manager(&path);
    assert!(manager.restore().await.is_none());
    assert!(matches!(manager.state(), AuthState::Unauthenticated));
    // The bad record was cleared, not left for the next startup.
    assert!(store.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_restore_discards_an_expired_slot() {
    let path = common::temp_slot_path();
    let store = common::inspect_store(&path);
    store
        .save(&PersistedToken::new(
            "whatever",
            Utc::now() - chrono::Duration::seconds(5),
        ))
        .await
        .unwrap();

    let manager = common::build_manager(&path);
    assert!(manager.restore().await.is_none());
    assert!(store.load().await.unwrap().is_none());
}
