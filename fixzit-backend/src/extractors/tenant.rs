// src/extractors/tenant.rs
use crate::api::AppState;
use crate::domain::tenant::TenantContext;
use crate::error::AppError;
use crate::middleware::auth::AuthenticatedUser;
use crate::utils::error_helper::{forbidden_error, internal_server_error, not_found_error};
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::debug;
use uuid::Uuid;

/// スーパー管理者が操作対象のテナントを指定するヘッダー
pub const ORG_ID_HEADER: &str = "x-org-id";

/// 認証済みユーザーからテナントを解決する
///
/// - テナント利用者: セッションの `org_id`（なければ403）
/// - スーパー管理者: `X-Org-Id` 必須（なし・不正は400、存在しない組織は404）
/// - 停止中の組織は403
impl FromRequestParts<AppState> for TenantContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<TenantContext>() {
            return Ok(ctx.clone());
        }

        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        let org_id = if user.is_super_admin() {
            let raw = parts
                .headers
                .get(ORG_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .ok_or_else(|| {
                    AppError::BadRequest(
                        "X-Org-Id header is required for superadmin access to tenant data"
                            .to_string(),
                    )
                })?;
            Uuid::parse_str(raw.trim()).map_err(|_| {
                AppError::BadRequest(format!("Invalid UUID format for 'X-Org-Id': '{}'", raw))
            })?
        } else {
            user.org_id().ok_or_else(|| {
                forbidden_error(
                    "User is not assigned to an organization",
                    "tenant::resolve",
                    Some(&user.user_id().to_string()),
                )
            })?
        };

        let org = state
            .organization_repository
            .find_by_id(org_id)
            .await
            .map_err(|e| internal_server_error(e, "tenant::resolve", "Failed to resolve organization"))?
            .ok_or_else(|| not_found_error("Organization", &org_id.to_string(), "tenant::resolve"))?;
        if org.is_suspended() {
            return Err(forbidden_error(
                "Organization is suspended",
                "tenant::resolve",
                Some(&user.user_id().to_string()),
            ));
        }

        let ctx = TenantContext {
            user_id: user.user_id(),
            org_id,
            role: user.role(),
            is_super_admin: user.is_super_admin(),
        };
        debug!(user_id = %ctx.user_id, org_id = %ctx.org_id, "Tenant resolved");
        parts.extensions.insert(ctx.clone());
        Ok(ctx)
    }
}
