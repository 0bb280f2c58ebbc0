//! Built-in demo accounts used for onboarding and testing.

use uuid::{Uuid, uuid};

use medboard_entity::DemoAccount;

/// One seed entry. Identifiers are fixed so tokens issued for a seed account
/// survive a process restart.
pub(crate) struct SeedAccount {
    pub id: Uuid,
    pub email: &'static str,
    pub secret: &'static str,
    pub display_name: &'static str,
    pub department: &'static str,
    pub persona: &'static str,
    pub role_label: &'static str,
}

pub(crate) const SEED_ACCOUNTS: &[SeedAccount] = &[
    SeedAccount {
        id: uuid!("c56a8e5d-2f14-4b07-9c61-0d3a41e87a01"),
        email: "admin@nmc.ae",
        secret: "admin123",
        display_name: "Aisha Al Zaabi",
        department: "IT Administration",
        persona: "System Administrator",
        role_label: "admin",
    },
    SeedAccount {
        id: uuid!("c56a8e5d-2f14-4b07-9c61-0d3a41e87a02"),
        email: "dr.mansoor@nmc.ae",
        secret: "doctor123",
        display_name: "Dr. Khalid Mansoor",
        department: "Cardiology",
        persona: "Attending Physician",
        role_label: "attending_physician",
    },
    SeedAccount {
        id: uuid!("c56a8e5d-2f14-4b07-9c61-0d3a41e87a03"),
        email: "dr.fatima@nmc.ae",
        secret: "resident123",
        display_name: "Dr. Fatima Hassan",
        department: "Internal Medicine",
        persona: "Medical Resident",
        role_label: "resident",
    },
    SeedAccount {
        id: uuid!("c56a8e5d-2f14-4b07-9c61-0d3a41e87a04"),
        email: "nurse.amina@nmc.ae",
        secret: "nurse123",
        display_name: "Amina Yusuf",
        department: "Ward 3 Nursing",
        persona: "Staff Nurse",
        role_label: "nurse",
    },
    SeedAccount {
        id: uuid!("c56a8e5d-2f14-4b07-9c61-0d3a41e87a05"),
        email: "qm.khalid@nmc.ae",
        secret: "quality123",
        display_name: "Khalid Rahman",
        department: "Quality & Patient Safety",
        persona: "Quality Manager",
        role_label: "quality_manager",
    },
    SeedAccount {
        id: uuid!("c56a8e5d-2f14-4b07-9c61-0d3a41e87a06"),
        email: "dr.omar@nmc.ae",
        secret: "imaging123",
        display_name: "Dr. Omar Siddiqui",
        department: "Radiology",
        persona: "Consultant Radiologist",
        role_label: "radiologist",
    },
    SeedAccount {
        id: uuid!("c56a8e5d-2f14-4b07-9c61-0d3a41e87a07"),
        email: "guest@nmc.ae",
        secret: "guest123",
        display_name: "Guest User",
        department: "Visitors",
        persona: "Guest",
        role_label: "guest",
    },
];

/// The demo account list, exposed read-only for onboarding screens.
pub fn demo_accounts() -> Vec<DemoAccount> {
    SEED_ACCOUNTS
        .iter()
        .map(|seed| DemoAccount {
            email: seed.email.to_string(),
            secret: seed.secret.to_string(),
            role_label: seed.role_label.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_account_per_role() {
        let labels: Vec<_> = SEED_ACCOUNTS.iter().map(|s| s.role_label).collect();
        assert_eq!(labels.len(), 7);
        for role in medboard_entity::Role::ALL {
            assert!(labels.contains(&role.as_str()), "missing seed for {role}");
        }
    }

    #[test]
    fn test_seed_ids_are_unique() {
        let mut ids: Vec<_> = SEED_ACCOUNTS.iter().map(|s| s.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), SEED_ACCOUNTS.len());
    }
}
