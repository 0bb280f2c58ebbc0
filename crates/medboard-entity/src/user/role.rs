//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use medboard_core::AppError;

/// Roles available in the clinical access-control system.
///
/// The set is closed: every directory entry carries one of these labels, and
/// the permission catalog is keyed by them. Unknown labels are mapped to
/// [`Role::Guest`] at authentication time rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full system administrator.
    Admin,
    /// Senior physician with prescribing authority.
    AttendingPhysician,
    /// Physician in training.
    Resident,
    /// Ward nurse.
    Nurse,
    /// Quality and patient-safety officer.
    QualityManager,
    /// Imaging specialist.
    Radiologist,
    /// Minimum-privilege fallback.
    Guest,
}

impl Role {
    /// Every role in the closed set.
    pub const ALL: [Role; 7] = [
        Self::Admin,
        Self::AttendingPhysician,
        Self::Resident,
        Self::Nurse,
        Self::QualityManager,
        Self::Radiologist,
        Self::Guest,
    ];

    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Return the role as its snake_case label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::AttendingPhysician => "attending_physician",
            Self::Resident => "resident",
            Self::Nurse => "nurse",
            Self::QualityManager => "quality_manager",
            Self::Radiologist => "radiologist",
            Self::Guest => "guest",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.to_lowercase();
        Self::ALL
            .iter()
            .find(|r| r.as_str() == label)
            .copied()
            .ok_or_else(|| {
                AppError::validation(format!(
                    "Invalid role label: '{s}'. Expected one of: admin, attending_physician, \
                     resident, nurse, quality_manager, radiologist, guest"
                ))
            })
    }
}
