// src/api/dto/settings_dto.rs
use crate::domain::platform_setting_model::{Model as SettingModel, SettingValueType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// 設定値の登録・更新
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertSettingRequest {
    #[validate(length(max = 10000, message = "Value must be 10000 characters or less"))]
    pub value: String,

    /// 省略時は既存の型、新規なら `string`
    pub value_type: Option<String>,

    #[validate(length(max = 500, message = "Description must be 500 characters or less"))]
    pub description: Option<String>,
}

/// 設定一覧の絞り込み（キーと説明に部分一致）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingListQuery {
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingResponse {
    pub key: String,
    pub value: String,
    pub value_type: String,
    /// 型に従って解釈した値
    pub typed_value: serde_json::Value,
    pub description: Option<String>,
    pub updated_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

impl From<SettingModel> for SettingResponse {
    fn from(setting: SettingModel) -> Self {
        let typed_value = setting
            .value_type
            .parse::<SettingValueType>()
            .map_or_else(
                |_| serde_json::Value::String(setting.value.clone()),
                |kind| kind.to_json(&setting.value),
            );
        Self {
            key: setting.key,
            value: setting.value,
            value_type: setting.value_type,
            typed_value,
            description: setting.description,
            updated_by: setting.updated_by,
            updated_at: setting.updated_at,
        }
    }
}
