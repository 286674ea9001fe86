// src/domain/permission.rs

//! 組み込みロールの権限マトリクス

use crate::domain::capability::{Action, Capability, Module};
use crate::domain::role::RoleName;
use serde::Serialize;
use std::collections::BTreeSet;

use Action::*;

fn grant(set: &mut BTreeSet<Capability>, module: Module, actions: &[Action]) {
    for action in actions {
        set.insert(Capability::new(module, *action));
    }
}

/// ロールに付与される権限の集合
pub fn capabilities_for(role: RoleName) -> BTreeSet<Capability> {
    let mut set = BTreeSet::new();

    match role {
        RoleName::SuperAdmin | RoleName::CorporateAdmin => {
            for module in Module::ALL {
                grant(&mut set, module, &Action::ALL);
            }
        }
        RoleName::Admin => {
            for module in Module::ALL {
                grant(&mut set, module, &[View, Create, Update, Delete, Export]);
            }
            grant(&mut set, Module::WorkOrder, &[Approve]);
            grant(&mut set, Module::Finance, &[Approve]);
        }
        RoleName::FmManager => {
            grant(&mut set, Module::WorkOrder, &Action::ALL);
            grant(&mut set, Module::Property, &Action::ALL);
            grant(&mut set, Module::Vendor, &Action::ALL);
            grant(&mut set, Module::Report, &[View, Export]);
            grant(&mut set, Module::Marketplace, &[View]);
        }
        RoleName::PropertyManager => {
            grant(&mut set, Module::Property, &[View, Create, Update]);
            grant(&mut set, Module::WorkOrder, &[View, Create, Update]);
            grant(&mut set, Module::Vendor, &[View]);
            grant(&mut set, Module::Report, &[View]);
        }
        RoleName::Technician => {
            grant(&mut set, Module::WorkOrder, &[View, Update]);
            grant(&mut set, Module::Property, &[View]);
        }
        RoleName::Finance => {
            grant(&mut set, Module::Finance, &Action::ALL);
            grant(&mut set, Module::Report, &[View, Export]);
            grant(&mut set, Module::Vendor, &[View]);
            grant(&mut set, Module::WorkOrder, &[View]);
        }
        RoleName::Hr => {
            grant(&mut set, Module::Hr, &Action::ALL);
            grant(&mut set, Module::User, &[View, Create, Update]);
            grant(&mut set, Module::Report, &[View]);
        }
        RoleName::Procurement => {
            grant(&mut set, Module::Vendor, &[View, Create, Update, Approve]);
            grant(&mut set, Module::Marketplace, &Action::ALL);
            grant(&mut set, Module::WorkOrder, &[View]);
        }
        RoleName::Tenant => {
            grant(&mut set, Module::WorkOrder, &[View, Create]);
            grant(&mut set, Module::Property, &[View]);
        }
        RoleName::Vendor => {
            grant(&mut set, Module::WorkOrder, &[View, Update]);
            grant(&mut set, Module::Marketplace, &[View, Create, Update]);
        }
        RoleName::Auditor => {
            for module in Module::ALL {
                grant(&mut set, module, &[View, Export]);
            }
        }
        RoleName::Viewer => {
            for module in [
                Module::WorkOrder,
                Module::Property,
                Module::Vendor,
                Module::Report,
            ] {
                grant(&mut set, module, &[View]);
            }
        }
    }

    set
}

/// ロールと追加権限（カスタムロール）を合わせて判定
pub fn is_allowed(role: RoleName, extra: &[Capability], required: Capability) -> bool {
    role.is_super_admin() || capabilities_for(role).contains(&required) || extra.contains(&required)
}

#[derive(Debug, Clone, Serialize)]
pub struct RolePermissionSummary {
    pub role: RoleName,
    pub permissions: Vec<String>,
}

/// 全組み込みロールの権限一覧
pub fn permission_summary() -> Vec<RolePermissionSummary> {
    RoleName::ALL
        .iter()
        .map(|role| RolePermissionSummary {
            role: *role,
            permissions: capabilities_for(*role)
                .into_iter()
                .map(|c| c.to_string())
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_super_admin_has_everything() {
        let caps = capabilities_for(RoleName::SuperAdmin);
        assert_eq!(caps.len(), Module::ALL.len() * Action::ALL.len());
    }

    #[test]
    fn test_vendor_capabilities_by_role() {
        let create = Capability::new(Module::Vendor, Action::Create);
        assert!(is_allowed(RoleName::FmManager, &[], create));
        assert!(is_allowed(RoleName::Procurement, &[], create));
        assert!(!is_allowed(RoleName::Technician, &[], create));
        assert!(!is_allowed(RoleName::Viewer, &[], create));
        assert!(is_allowed(
            RoleName::Viewer,
            &[Capability::new(Module::Vendor, Action::View)],
            Capability::new(Module::Vendor, Action::View)
        ));
    }

    #[test]
    fn test_custom_capabilities_extend_role() {
        let delete = Capability::new(Module::Vendor, Action::Delete);
        assert!(!is_allowed(RoleName::Technician, &[], delete));
        assert!(is_allowed(RoleName::Technician, &[delete], delete));
    }

    #[test]
    fn test_auditor_is_read_only() {
        let caps = capabilities_for(RoleName::Auditor);
        assert!(caps
            .iter()
            .all(|c| matches!(c.action, Action::View | Action::Export)));
    }

    #[test]
    fn test_summary_covers_all_roles() {
        let summary = permission_summary();
        assert_eq!(summary.len(), RoleName::ALL.len());
        assert!(summary.iter().all(|s| !s.permissions.is_empty()));
    }
}
