//! The authentication state machine and its collaborator surface.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, watch};
use tracing::{error, info, warn};

use medboard_core::AppResult;
use medboard_core::config::{AuthConfig, SessionConfig};
use medboard_core::error::AppError;
use medboard_entity::{AuthState, Credentials, Identity, Permission, PersistedToken, Role};

use super::lifecycle::{LifecycleState, SessionLifecycle};
use super::store::SessionStore;
use crate::authenticator::Authenticator;
use crate::rbac::{AccessPolicy, AuthorizationEngine};
use crate::token::TokenService;

/// State shared between the manager and the timer task of the live session.
///
/// The epoch counter serializes overlapping work: every transition bumps it,
/// and anything that completes against an older epoch is discarded. Only
/// this struct touches the persisted slot.
pub(crate) struct SessionCore {
    /// The observable authentication state.
    state_tx: watch::Sender<AuthState>,
    /// The single persisted token slot.
    store: SessionStore,
    /// Generation counter for in-flight work.
    epoch: AtomicU64,
}

impl SessionCore {
    fn current_epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Starts a new generation, invalidating all in-flight work.
    fn begin_epoch(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Unconditional teardown: invalidates in-flight work, clears the slot,
    /// and lands in `Unauthenticated`.
    async fn clear_session(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        if let Err(e) = self.store.clear().await {
            error!(error = %e, "failed to clear persisted session slot");
        }
        self.state_tx.send_replace(AuthState::Unauthenticated);
    }

    /// Hard expiry entry point for the timer task.
    pub(crate) async fn force_logout(&self, epoch: u64) {
        if epoch != self.current_epoch() {
            warn!(stale_epoch = epoch, "ignoring expiry of a superseded session");
            return;
        }
        info!("session expired, forcing logout");
        self.clear_session().await;
    }
}

/// The authentication state machine.
///
/// Holds exactly one session at a time. Login, restore, and logout are
/// serialized; collaborators consume `current_identity()`,
/// `is_authenticated()`, and `authorize(policy)`, or subscribe to the state
/// watch channel.
pub struct SessionManager {
    core: Arc<SessionCore>,
    authenticator: Authenticator,
    tokens: TokenService,
    engine: AuthorizationEngine,
    /// Timer handle of the live session.
    lifecycle: Mutex<Option<SessionLifecycle>>,
    /// Serializes login/restore transitions.
    transition: Mutex<()>,
    session_ttl: Duration,
    warning_lead: Duration,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("session_ttl", &self.session_ttl)
            .field("warning_lead", &self.warning_lead)
            .finish()
    }
}

impl SessionManager {
    /// Creates a new manager. The initial state is `Unauthenticated`;
    /// callers run [`SessionManager::restore`] once at startup to resume a
    /// persisted session.
    pub fn new(
        authenticator: Authenticator,
        tokens: TokenService,
        store: SessionStore,
        auth_config: &AuthConfig,
        session_config: &SessionConfig,
    ) -> Self {
        let (state_tx, _) = watch::channel(AuthState::Unauthenticated);
        Self {
            core: Arc::new(SessionCore {
                state_tx,
                store,
                epoch: AtomicU64::new(0),
            }),
            authenticator,
            tokens,
            engine: AuthorizationEngine::new(),
            lifecycle: Mutex::new(None),
            transition: Mutex::new(()),
            session_ttl: Duration::from_secs(auth_config.session_ttl_hours.saturating_mul(3600)),
            warning_lead: Duration::from_secs(
                session_config.warning_lead_minutes.saturating_mul(60),
            ),
        }
    }

    /// Verifies credentials, issues and persists a token, and transitions to
    /// `Authenticated`.
    ///
    /// A second login while one is in flight is rejected with
    /// `TransitionConflict` rather than interleaved, so two logins can never
    /// race two tokens into the single slot. A logout issued mid-flight
    /// supersedes the login: the late response is discarded.
    pub async fn login(&self, credentials: &Credentials) -> AppResult<Identity> {
        let _guard = self.transition.try_lock().map_err(|_| {
            AppError::transition_conflict("Another login or restore is already in flight")
        })?;

        self.stop_lifecycle().await;
        let epoch = self.core.begin_epoch();
        self.core.state_tx.send_replace(AuthState::Authenticating);

        match self.perform_login(credentials, epoch).await {
            Ok(identity) => {
                if epoch != self.core.current_epoch() {
                    // Superseded after the token was persisted; undo the write.
                    warn!(user_id = %identity.id, "discarding login superseded by logout");
                    if let Err(e) = self.core.store.clear().await {
                        error!(error = %e, "failed to clear superseded login token");
                    }
                    return Err(AppError::transition_conflict(
                        "Login was superseded before completion",
                    ));
                }
                self.core
                    .state_tx
                    .send_replace(AuthState::Authenticated(identity.clone()));
                self.start_lifecycle(self.session_ttl, epoch).await;
                info!(user_id = %identity.id, role = %identity.role, "login successful");
                Ok(identity)
            }
            Err(e) => {
                if epoch == self.core.current_epoch() {
                    self.core
                        .state_tx
                        .send_replace(AuthState::Error(e.message.clone()));
                } else {
                    warn!("discarding failed login superseded by logout");
                }
                Err(e)
            }
        }
    }

    async fn perform_login(&self, credentials: &Credentials, epoch: u64) -> AppResult<Identity> {
        let identity = self.authenticator.authenticate(credentials).await?;

        if epoch != self.core.current_epoch() {
            return Err(AppError::transition_conflict(
                "Login was superseded before completion",
            ));
        }

        let issued = self.tokens.issue(&identity)?;
        self.core
            .store
            .save(&PersistedToken::new(issued.token, issued.expires_at))
            .await?;

        Ok(identity)
    }

    /// Resumes the persisted session, if any.
    ///
    /// Passes through `Authenticating` while the slot is read and verified.
    /// Every failure — empty slot, tampered or expired token, vanished
    /// subject, I/O trouble — resolves to `Unauthenticated`; nothing is
    /// surfaced to the caller.
    pub async fn restore(&self) -> Option<Identity> {
        let Ok(_guard) = self.transition.try_lock() else {
            warn!("restore skipped: another transition is in flight");
            return None;
        };

        self.stop_lifecycle().await;
        let epoch = self.core.begin_epoch();
        self.core.state_tx.send_replace(AuthState::Authenticating);

        let record = match self.core.store.load().await {
            Ok(Some(record)) => record,
            Ok(None) => {
                self.core.state_tx.send_replace(AuthState::Unauthenticated);
                return None;
            }
            Err(e) => {
                warn!(error = %e, "failed to read persisted session slot");
                self.core.state_tx.send_replace(AuthState::Unauthenticated);
                return None;
            }
        };

        match self.tokens.verify(&record.token).await {
            Ok(identity) => {
                if epoch != self.core.current_epoch() {
                    warn!("discarding restore superseded by logout");
                    return None;
                }
                let remaining = (record.expires_at - Utc::now())
                    .to_std()
                    .unwrap_or(Duration::ZERO);
                self.core
                    .state_tx
                    .send_replace(AuthState::Authenticated(identity.clone()));
                self.start_lifecycle(remaining, epoch).await;
                info!(user_id = %identity.id, "session restored from persisted token");
                Some(identity)
            }
            Err(e) => {
                info!(reason = %e, "persisted token rejected, starting unauthenticated");
                if let Err(e) = self.core.store.clear().await {
                    error!(error = %e, "failed to clear rejected session slot");
                }
                if epoch == self.core.current_epoch() {
                    self.core.state_tx.send_replace(AuthState::Unauthenticated);
                }
                None
            }
        }
    }

    /// Ends the session unconditionally: cancels the timers, clears the
    /// persisted slot, and lands in `Unauthenticated`. Idempotent, and safe
    /// to call while a login is still in flight (the stale response is
    /// discarded).
    pub async fn logout(&self) {
        self.stop_lifecycle().await;
        self.core.clear_session().await;
        info!("logged out");
    }

    /// Dismisses a login error: `Error` → `Unauthenticated`, no side
    /// effects. Any other state is left untouched.
    pub fn clear_error(&self) {
        self.core.state_tx.send_if_modified(|state| {
            if matches!(state, AuthState::Error(_)) {
                *state = AuthState::Unauthenticated;
                true
            } else {
                false
            }
        });
    }

    /// Extends the current session from inside the expiry warning window.
    ///
    /// Extension is a genuine re-issuance, not a visual reset: a fresh token
    /// is signed and persisted before the timers re-arm for a full session.
    /// Outside the warning window this returns `TransitionConflict`.
    pub async fn extend(&self) -> AppResult<()> {
        let lifecycle = self.lifecycle.lock().await;
        let handle = lifecycle
            .as_ref()
            .ok_or_else(|| AppError::transition_conflict("No active session to extend"))?;

        if !matches!(handle.state(), LifecycleState::Warning { .. }) {
            return Err(AppError::transition_conflict(
                "Extension is only accepted during the expiry warning window",
            ));
        }

        let identity = self
            .current_identity()
            .ok_or_else(|| AppError::transition_conflict("No authenticated identity"))?;

        let issued = self.tokens.issue(&identity)?;
        let expires_at = issued.expires_at;
        self.core
            .store
            .save(&PersistedToken::new(issued.token, expires_at))
            .await?;

        if handle.extend().await {
            info!(user_id = %identity.id, new_expiry = %expires_at, "session extended");
            Ok(())
        } else {
            // The countdown drained while the new token was being written.
            if !self.is_authenticated() {
                if let Err(e) = self.core.store.clear().await {
                    error!(error = %e, "failed to clear token persisted during expiry");
                }
            }
            Err(AppError::transition_conflict(
                "Session expired before the extension was applied",
            ))
        }
    }

    /// The current authentication state.
    pub fn state(&self) -> AuthState {
        self.core.state_tx.borrow().clone()
    }

    /// A receiver for observing authentication state transitions.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.core.state_tx.subscribe()
    }

    /// The authenticated identity, if any.
    pub fn current_identity(&self) -> Option<Identity> {
        self.core.state_tx.borrow().identity().cloned()
    }

    /// Whether a verified identity is currently held.
    pub fn is_authenticated(&self) -> bool {
        self.core.state_tx.borrow().is_authenticated()
    }

    /// Exact role match against the current identity.
    pub fn has_role(&self, role: Role) -> bool {
        let state = self.core.state_tx.borrow();
        self.engine.has_role(state.identity(), role)
    }

    /// Permission membership against the current identity.
    pub fn has_permission(&self, permission: Permission) -> bool {
        let state = self.core.state_tx.borrow();
        self.engine.has_permission(state.identity(), permission)
    }

    /// Evaluates an access policy against the current identity.
    pub fn authorize(&self, policy: &AccessPolicy) -> bool {
        let state = self.core.state_tx.borrow();
        self.engine.authorize(state.identity(), policy)
    }

    /// The timer state of the live session, if one exists.
    pub async fn lifecycle_state(&self) -> Option<LifecycleState> {
        self.lifecycle.lock().await.as_ref().map(|h| h.state())
    }

    /// A receiver for observing timer state transitions of the live session.
    pub async fn lifecycle_updates(&self) -> Option<watch::Receiver<LifecycleState>> {
        self.lifecycle.lock().await.as_ref().map(|h| h.subscribe())
    }

    async fn start_lifecycle(&self, initial_ttl: Duration, epoch: u64) {
        let handle = SessionLifecycle::spawn(
            initial_ttl,
            self.session_ttl,
            self.warning_lead,
            Arc::clone(&self.core),
            epoch,
        );
        let mut slot = self.lifecycle.lock().await;
        if let Some(old) = slot.replace(handle) {
            old.stop();
        }
    }

    async fn stop_lifecycle(&self) {
        if let Some(handle) = self.lifecycle.lock().await.take() {
            handle.stop();
        }
    }
}
