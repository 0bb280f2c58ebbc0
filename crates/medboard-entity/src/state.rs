//! The tagged authentication state.

use serde::{Deserialize, Serialize};

use crate::user::Identity;

/// Authentication state of the client session.
///
/// A tagged variant rather than a bag of booleans: exactly one of these
/// holds at any time, and collaborators observe transitions through a watch
/// channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AuthState {
    /// No session.
    Unauthenticated,
    /// A login or restore is in flight.
    Authenticating,
    /// A live session with a verified identity.
    Authenticated(Identity),
    /// The last login attempt failed with a user-visible message.
    Error(String),
}

impl AuthState {
    /// Whether a verified identity is currently held.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// The current identity, if authenticated.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }

    /// Short variant label for structured logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Authenticating => "authenticating",
            Self::Authenticated(_) => "authenticated",
            Self::Error(_) => "error",
        }
    }
}
