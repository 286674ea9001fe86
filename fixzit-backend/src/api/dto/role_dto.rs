// src/api/dto/role_dto.rs
use crate::api::dto::deserialize_nullable;
use crate::domain::permission::RolePermissionSummary;
use crate::domain::role_model::Model as RoleModel;
use crate::utils::validation::validate_capability_list;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// --- リクエストDTO ---

/// カスタムロール作成リクエスト
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRoleRequest {
    #[validate(length(min = 1, max = 64, message = "Role name must be between 1 and 64 characters"))]
    pub name: String,

    #[validate(length(max = 500, message = "Description must be 500 characters or less"))]
    pub description: Option<String>,

    #[validate(custom(function = validate_capability_list))]
    pub permissions: Vec<String>,
}

/// カスタムロール更新リクエスト
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRoleRequest {
    #[validate(length(min = 1, max = 64, message = "Role name must be between 1 and 64 characters"))]
    pub name: Option<String>,

    /// `null` で説明を消去
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[validate(length(max = 500, message = "Description must be 500 characters or less"))]
    pub description: Option<Option<String>>,

    #[validate(custom(function = validate_capability_list))]
    pub permissions: Option<Vec<String>>,
}

impl UpdateRoleRequest {
    pub fn has_updates(&self) -> bool {
        self.name.is_some() || self.description.is_some() || self.permissions.is_some()
    }
}

// --- レスポンスDTO ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub permissions: Vec<String>,
    pub is_system: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RoleModel> for RoleResponse {
    fn from(role: RoleModel) -> Self {
        Self {
            permissions: role.permission_strings(),
            id: role.id,
            name: role.name,
            description: role.description,
            is_system: role.is_system,
            created_at: role.created_at,
            updated_at: role.updated_at,
        }
    }
}

/// 組み込みロールの権限マトリクス
#[derive(Debug, Clone, Serialize)]
pub struct RoleMatrixResponse {
    pub modules: Vec<&'static str>,
    pub actions: Vec<&'static str>,
    pub roles: Vec<RolePermissionSummary>,
}
