// src/domain/capability.rs

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 権限の対象モジュール
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Module {
    WorkOrder,
    Property,
    Vendor,
    Finance,
    Hr,
    Marketplace,
    Crm,
    User,
    Report,
    Settings,
}

impl Module {
    pub const ALL: [Module; 10] = [
        Module::WorkOrder,
        Module::Property,
        Module::Vendor,
        Module::Finance,
        Module::Hr,
        Module::Marketplace,
        Module::Crm,
        Module::User,
        Module::Report,
        Module::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Module::WorkOrder => "WORK_ORDER",
            Module::Property => "PROPERTY",
            Module::Vendor => "VENDOR",
            Module::Finance => "FINANCE",
            Module::Hr => "HR",
            Module::Marketplace => "MARKETPLACE",
            Module::Crm => "CRM",
            Module::User => "USER",
            Module::Report => "REPORT",
            Module::Settings => "SETTINGS",
        }
    }
}

/// 操作種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    View,
    Create,
    Update,
    Delete,
    Approve,
    Export,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::View,
        Action::Create,
        Action::Update,
        Action::Delete,
        Action::Approve,
        Action::Export,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "VIEW",
            Action::Create => "CREATE",
            Action::Update => "UPDATE",
            Action::Delete => "DELETE",
            Action::Approve => "APPROVE",
            Action::Export => "EXPORT",
        }
    }
}

/// `MODULE:ACTION` で表される単一の権限
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Capability {
    pub module: Module,
    pub action: Action,
}

impl Capability {
    pub const fn new(module: Module, action: Action) -> Self {
        Self { module, action }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module.as_str(), self.action.as_str())
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (module_raw, action_raw) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| format!("Invalid capability format: {}", s))?;

        let module = Module::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == module_raw)
            .ok_or_else(|| format!("Unknown module: {}", module_raw))?;
        let action = Action::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == action_raw)
            .ok_or_else(|| format!("Unknown action: {}", action_raw))?;

        Ok(Self { module, action })
    }
}

impl Serialize for Capability {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Capability {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let cap: Capability = "VENDOR:CREATE".parse().unwrap();
        assert_eq!(cap, Capability::new(Module::Vendor, Action::Create));
        assert_eq!(cap.to_string(), "VENDOR:CREATE");
    }

    #[test]
    fn test_parse_rejects_unknown_parts() {
        assert!("VENDOR".parse::<Capability>().is_err());
        assert!("VENDOR:FLY".parse::<Capability>().is_err());
        assert!("SPACESHIP:VIEW".parse::<Capability>().is_err());
        assert!("vendor:view".parse::<Capability>().is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let cap = Capability::new(Module::WorkOrder, Action::Approve);
        let json = serde_json::to_string(&cap).unwrap();
        assert_eq!(json, "\"WORK_ORDER:APPROVE\"");
        let back: Capability = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cap);
    }
}
