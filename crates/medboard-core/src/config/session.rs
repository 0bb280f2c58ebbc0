//! Session lifecycle configuration.

use serde::{Deserialize, Serialize};

/// Session lifecycle configuration.
///
/// The expiry warning fires `warning_lead_minutes` before the session token
/// expires; the countdown below it always ticks at one-second granularity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// How long before expiry the warning fires, in minutes.
    #[serde(default = "default_warning_lead")]
    pub warning_lead_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            warning_lead_minutes: default_warning_lead(),
        }
    }
}

fn default_warning_lead() -> u64 {
    60
}
