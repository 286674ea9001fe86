// src/domain/role.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 組み込みロール
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleName {
    SuperAdmin,
    CorporateAdmin,
    Admin,
    FmManager,
    PropertyManager,
    Technician,
    Finance,
    Hr,
    Procurement,
    Tenant,
    Vendor,
    Auditor,
    Viewer,
}

impl RoleName {
    pub const ALL: [RoleName; 13] = [
        RoleName::SuperAdmin,
        RoleName::CorporateAdmin,
        RoleName::Admin,
        RoleName::FmManager,
        RoleName::PropertyManager,
        RoleName::Technician,
        RoleName::Finance,
        RoleName::Hr,
        RoleName::Procurement,
        RoleName::Tenant,
        RoleName::Vendor,
        RoleName::Auditor,
        RoleName::Viewer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::SuperAdmin => "SUPER_ADMIN",
            RoleName::CorporateAdmin => "CORPORATE_ADMIN",
            RoleName::Admin => "ADMIN",
            RoleName::FmManager => "FM_MANAGER",
            RoleName::PropertyManager => "PROPERTY_MANAGER",
            RoleName::Technician => "TECHNICIAN",
            RoleName::Finance => "FINANCE",
            RoleName::Hr => "HR",
            RoleName::Procurement => "PROCUREMENT",
            RoleName::Tenant => "TENANT",
            RoleName::Vendor => "VENDOR",
            RoleName::Auditor => "AUDITOR",
            RoleName::Viewer => "VIEWER",
        }
    }

    pub fn is_super_admin(&self) -> bool {
        matches!(self, RoleName::SuperAdmin)
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        RoleName::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| format!("Unknown role: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_through_str() {
        for role in RoleName::ALL {
            assert_eq!(role.as_str().parse::<RoleName>().unwrap(), role);
        }
        assert_eq!("fm_manager".parse::<RoleName>().unwrap(), RoleName::FmManager);
        assert!("JANITOR".parse::<RoleName>().is_err());
    }

    #[test]
    fn test_serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&RoleName::PropertyManager).unwrap();
        assert_eq!(json, "\"PROPERTY_MANAGER\"");
    }
}
