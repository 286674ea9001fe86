// src/api/dto/user_dto.rs
use crate::domain::user_model::Model as UserModel;
use crate::api::dto::deserialize_nullable;
use crate::types::PaginationQuery;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// --- リクエストDTO ---

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 200, message = "Full name must be between 1 and 200 characters"))]
    pub full_name: String,

    #[validate(length(min = 1, max = 128, message = "Password is required"))]
    pub password: String,

    pub role: String,

    pub org_id: Uuid,

    pub custom_role_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 200, message = "Full name must be between 1 and 200 characters"))]
    pub full_name: Option<String>,

    pub role: Option<String>,

    pub status: Option<String>,

    /// `null` でカスタムロールを外す
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub custom_role_id: Option<Option<Uuid>>,
}

impl UpdateUserRequest {
    pub fn has_updates(&self) -> bool {
        self.full_name.is_some()
            || self.role.is_some()
            || self.status.is_some()
            || self.custom_role_id.is_some()
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BulkStatusRequest {
    #[validate(length(min = 1, max = 500, message = "user_ids must contain between 1 and 500 ids"))]
    pub user_ids: Vec<Uuid>,

    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListQuery {
    pub search: Option<String>,
    pub org_id: Option<Uuid>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl UserListQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

// --- レスポンスDTO ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub org_id: Option<Uuid>,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub custom_role_id: Option<Uuid>,
    pub status: String,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserModel> for UserResponse {
    fn from(user: UserModel) -> Self {
        Self {
            id: user.id,
            org_id: user.org_id,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            custom_role_id: user.custom_role_id,
            status: user.status,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// 一括ステータス変更の結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkStatusResponse {
    pub requested: usize,
    pub updated: u64,
    pub skipped_super_admins: Vec<Uuid>,
    pub not_found: Vec<Uuid>,
}
