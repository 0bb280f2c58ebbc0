//! # medboard-entity
//!
//! Domain value objects for Medboard. Every struct in this crate is a plain
//! value: roles, permissions, directory records, the authenticated identity,
//! and the tagged authentication state. All entities derive `Debug`,
//! `Clone`, `Serialize`, and `Deserialize` — except [`Credentials`], which
//! redacts its secret from `Debug` and is never serialized.

pub mod credentials;
pub mod permission;
pub mod state;
pub mod token;
pub mod user;

pub use credentials::Credentials;
pub use permission::Permission;
pub use state::AuthState;
pub use token::PersistedToken;
pub use user::{DemoAccount, Identity, Role, UserRecord};
