// src/domain/platform_setting_model.rs
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "platform_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    pub value: String,
    pub value_type: String,
    pub description: Option<String>,
    pub updated_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

string_enum! {
    pub enum SettingValueType {
        String => "string",
        Number => "number",
        Boolean => "boolean",
        Json => "json",
    }
}

impl SettingValueType {
    /// 値が型として解釈できるか検証する
    pub fn check(&self, value: &str) -> Result<(), String> {
        let ok = match self {
            SettingValueType::String => true,
            SettingValueType::Number => value.trim().parse::<f64>().is_ok_and(|n| n.is_finite()),
            SettingValueType::Boolean => matches!(value.trim(), "true" | "false"),
            SettingValueType::Json => serde_json::from_str::<serde_json::Value>(value).is_ok(),
        };
        if ok {
            Ok(())
        } else {
            Err(format!("value is not a valid {}", self.as_str()))
        }
    }

    /// 型に応じたJSON値へ変換
    pub fn to_json(&self, value: &str) -> serde_json::Value {
        match self {
            SettingValueType::String => serde_json::Value::String(value.to_string()),
            SettingValueType::Number => value
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            SettingValueType::Boolean => serde_json::Value::Bool(value.trim() == "true"),
            SettingValueType::Json => {
                serde_json::from_str(value).unwrap_or(serde_json::Value::Null)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_type_check() {
        assert!(SettingValueType::Number.check("12.5").is_ok());
        assert!(SettingValueType::Number.check("abc").is_err());
        assert!(SettingValueType::Boolean.check("true").is_ok());
        assert!(SettingValueType::Boolean.check("yes").is_err());
        assert!(SettingValueType::Json.check("{\"a\":1}").is_ok());
        assert!(SettingValueType::Json.check("{a:1}").is_err());
        assert!(SettingValueType::String.check("anything").is_ok());
    }

    #[test]
    fn test_to_json() {
        assert_eq!(SettingValueType::Boolean.to_json("true"), serde_json::json!(true));
        assert_eq!(SettingValueType::Number.to_json("3"), serde_json::json!(3.0));
    }
}
