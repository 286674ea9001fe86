// src/api/dto/auth_dto.rs
use crate::domain::role::RoleName;
use crate::domain::user_model::Model as UserModel;
use crate::utils::jwt::{SessionClaims, SessionKind};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// --- リクエストDTO ---

/// ログインリクエスト（スーパー管理者・テナント共通）
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 128, message = "Password is required"))]
    pub password: String,
}

// --- レスポンスDTO ---

/// セッションに紐づくユーザー概要
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUserResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: RoleName,
    pub org_id: Option<Uuid>,
}

impl From<&UserModel> for SessionUserResponse {
    fn from(user: &UserModel) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role_name(),
            org_id: user.org_id,
        }
    }
}

/// ログイン成功レスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: SessionUserResponse,
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub expires_at: DateTime<Utc>,
}

/// 現在のセッション情報
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfoResponse {
    pub user_id: Uuid,
    pub email: String,
    pub role: RoleName,
    pub org_id: Option<Uuid>,
    pub kind: SessionKind,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<&SessionClaims> for SessionInfoResponse {
    fn from(claims: &SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email.clone(),
            role: claims.role,
            org_id: claims.org_id,
            kind: claims.kind,
            issued_at: Utc.timestamp_opt(claims.iat, 0).single(),
            expires_at: Utc.timestamp_opt(claims.exp, 0).single(),
        }
    }
}
