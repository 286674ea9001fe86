// src/api/dto/mod.rs
pub mod audit_log_dto;
pub mod auth_dto;
pub mod benchmark_dto;
pub mod billing_dto;
pub mod branding_dto;
pub mod feature_flag_dto;
pub mod notification_dto;
pub mod organization_dto;
pub mod role_dto;
pub mod scheduled_task_dto;
pub mod settings_dto;
pub mod user_dto;
pub mod vendor_dto;
pub mod webhook_dto;
pub mod work_order_dto;

use serde::{Deserialize, Deserializer};

/// 部分更新用: フィールド省略は `None`、明示的な `null` は `Some(None)`
pub(crate) fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "deserialize_nullable")]
        value: Option<Option<String>>,
    }

    #[test]
    fn test_nullable_distinguishes_missing_and_null() {
        let missing: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.value, None);

        let null: Patch = serde_json::from_str(r#"{"value":null}"#).unwrap();
        assert_eq!(null.value, Some(None));

        let set: Patch = serde_json::from_str(r#"{"value":"x"}"#).unwrap();
        assert_eq!(set.value, Some(Some("x".to_string())));
    }
}
