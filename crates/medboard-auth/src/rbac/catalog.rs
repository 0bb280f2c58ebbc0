//! Role-to-permission mapping definitions.

use std::collections::{HashMap, HashSet};

use medboard_entity::{Permission, Role};

/// Defines the mapping from each role to its set of permissions.
///
/// The catalog is pure data: for a given role the returned set is always the
/// same, and every role maps to a non-empty set. A role missing from the map
/// degrades to the guest set rather than failing.
#[derive(Debug, Clone)]
pub struct PermissionCatalog {
    /// Role → set of permissions.
    policies: HashMap<Role, HashSet<Permission>>,
}

impl PermissionCatalog {
    /// Creates the default catalog.
    pub fn new() -> Self {
        let mut policies = HashMap::new();

        policies.insert(Role::Guest, HashSet::from([Permission::ViewDashboard]));

        policies.insert(
            Role::Nurse,
            HashSet::from([
                Permission::ViewDashboard,
                Permission::ViewPatients,
                Permission::MedicationAdmin,
                Permission::QualityMetrics,
            ]),
        );

        policies.insert(
            Role::Resident,
            HashSet::from([
                Permission::ViewDashboard,
                Permission::ViewPatients,
                Permission::EditPatients,
                Permission::CdsAccess,
                Permission::IcdCoding,
                Permission::ImagingReports,
            ]),
        );

        policies.insert(
            Role::AttendingPhysician,
            HashSet::from([
                Permission::ViewDashboard,
                Permission::ViewPatients,
                Permission::EditPatients,
                Permission::Prescribe,
                Permission::CdsAccess,
                Permission::IcdCoding,
                Permission::ImagingReports,
                Permission::AppropriatenessCheck,
                Permission::QualityMetrics,
            ]),
        );

        policies.insert(
            Role::QualityManager,
            HashSet::from([
                Permission::ViewDashboard,
                Permission::ViewPatients,
                Permission::QualityMetrics,
                Permission::JciAccess,
                Permission::AuditAccess,
                Permission::RulesManagement,
            ]),
        );

        policies.insert(
            Role::Radiologist,
            HashSet::from([
                Permission::ViewDashboard,
                Permission::ViewPatients,
                Permission::ImagingReports,
                Permission::AppropriatenessCheck,
                Permission::IcdCoding,
            ]),
        );

        policies.insert(Role::Admin, Permission::ALL.into_iter().collect());

        Self { policies }
    }

    /// Returns the set of permissions for the given role.
    ///
    /// A role absent from the catalog yields the guest set: unknown roles
    /// get minimum privilege, never an error.
    pub fn permissions_for(&self, role: Role) -> HashSet<Permission> {
        match self.policies.get(&role) {
            Some(set) => set.clone(),
            None => self
                .policies
                .get(&Role::Guest)
                .cloned()
                .unwrap_or_default(),
        }
    }

    /// Checks whether the given role has the specified permission.
    pub fn has_permission(&self, role: Role, permission: Permission) -> bool {
        self.policies
            .get(&role)
            .map(|perms| perms.contains(&permission))
            .unwrap_or(false)
    }
}

impl Default for PermissionCatalog {
    fn default() -> Self {
        Self::new()
    }
}
