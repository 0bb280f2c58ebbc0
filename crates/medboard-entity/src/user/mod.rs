//! User domain entities.

pub mod model;
pub mod role;

pub use model::{DemoAccount, Identity, UserRecord};
pub use role::Role;
