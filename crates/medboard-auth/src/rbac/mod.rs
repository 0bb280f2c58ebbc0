//! Role-based access control: the permission catalog and the
//! authorization engine consulted by access-controlled collaborators.

pub mod catalog;
pub mod engine;

pub use catalog::PermissionCatalog;
pub use engine::{AccessPolicy, AuthorizationEngine, MatchMode};
