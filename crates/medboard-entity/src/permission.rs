//! Capability tags checked by access-controlled collaborators.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use medboard_core::AppError;

/// A capability tag granted through a role.
///
/// Permissions are always derived from a [`Role`](crate::Role) via the
/// permission catalog; they are never assigned ad hoc to an individual
/// identity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// View the main dashboard.
    ViewDashboard,
    /// View patient lists and records.
    ViewPatients,
    /// Edit patient records.
    EditPatients,
    /// Create prescriptions.
    Prescribe,
    /// Use clinical decision support.
    CdsAccess,
    /// Use ICD coding tools.
    IcdCoding,
    /// Administer medication.
    MedicationAdmin,
    /// Search the audit trail.
    AuditAccess,
    /// View quality metrics and KPIs.
    QualityMetrics,
    /// Access JCI accreditation views.
    JciAccess,
    /// Manage clinical rules.
    RulesManagement,
    /// Read imaging reports.
    ImagingReports,
    /// Run imaging appropriateness checks.
    AppropriatenessCheck,
    /// Administer the system.
    SystemAdmin,
    /// Manage user accounts.
    UserManagement,
}

impl Permission {
    /// Every permission in the closed set, in declaration order.
    pub const ALL: [Permission; 15] = [
        Self::ViewDashboard,
        Self::ViewPatients,
        Self::EditPatients,
        Self::Prescribe,
        Self::CdsAccess,
        Self::IcdCoding,
        Self::MedicationAdmin,
        Self::AuditAccess,
        Self::QualityMetrics,
        Self::JciAccess,
        Self::RulesManagement,
        Self::ImagingReports,
        Self::AppropriatenessCheck,
        Self::SystemAdmin,
        Self::UserManagement,
    ];

    /// Return the permission as its snake_case tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewDashboard => "view_dashboard",
            Self::ViewPatients => "view_patients",
            Self::EditPatients => "edit_patients",
            Self::Prescribe => "prescribe",
            Self::CdsAccess => "cds_access",
            Self::IcdCoding => "icd_coding",
            Self::MedicationAdmin => "medication_admin",
            Self::AuditAccess => "audit_access",
            Self::QualityMetrics => "quality_metrics",
            Self::JciAccess => "jci_access",
            Self::RulesManagement => "rules_management",
            Self::ImagingReports => "imaging_reports",
            Self::AppropriatenessCheck => "appropriateness_check",
            Self::SystemAdmin => "system_admin",
            Self::UserManagement => "user_management",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|p| p.as_str() == s)
            .copied()
            .ok_or_else(|| AppError::validation(format!("Invalid permission tag: '{s}'")))
    }
}
