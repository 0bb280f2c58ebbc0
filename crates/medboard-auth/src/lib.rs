//! # medboard-auth
//!
//! Identity and access control for the Medboard clinical dashboard:
//! credential verification, signed-token issuance and verification,
//! role/permission authorization decisions, and time-bounded session
//! lifecycle management.
//!
//! ## Modules
//!
//! - `authenticator` — credential verification against the user directory
//! - `directory` — user directory trait, seeded in-memory implementation
//! - `password` — Argon2id secret hashing and verification
//! - `rbac` — permission catalog and the authorization engine
//! - `token` — signed session token issuance and verification
//! - `session` — persisted slot, auth state machine, expiry timers

pub mod authenticator;
pub mod directory;
pub mod password;
pub mod rbac;
pub mod session;
pub mod token;

pub use authenticator::Authenticator;
pub use directory::{MemoryDirectory, UserDirectory, demo_accounts};
pub use password::PasswordHasher;
pub use rbac::{AccessPolicy, AuthorizationEngine, MatchMode, PermissionCatalog};
pub use session::{LifecycleState, SessionLifecycle, SessionManager, SessionStore};
pub use token::{Claims, IssuedToken, TokenService};
