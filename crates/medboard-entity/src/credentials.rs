//! Transient credential pair submitted at login.

use std::fmt;

use serde::Deserialize;

/// An email/secret pair.
///
/// Credentials are transient: they are consumed by a single verification
/// call and never persisted or serialized. `Debug` redacts the secret so it
/// cannot leak through logs.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    /// Login email.
    pub email: String,
    /// Plaintext login secret.
    pub secret: String,
}

impl Credentials {
    /// Create a new credential pair.
    pub fn new(email: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("secret", &"<redacted>")
            .finish()
    }
}
