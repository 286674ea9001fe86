// src/api/handlers/user_handler.rs
use crate::api::dto::user_dto::{
    BulkStatusRequest, BulkStatusResponse, CreateUserRequest, UpdateUserRequest, UserListQuery,
    UserResponse,
};
use crate::api::AppState;
use crate::domain::audit_log_model::AuditActor;
use crate::error::AppResult;
use crate::extractors::{ApiQuery, ValidatedJson, ValidatedUuid};
use crate::types::{ApiResponse, PaginatedResponse};
use crate::utils::error_helper::ensure_has_updates;
use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use tracing::info;

/// ユーザー一覧（検索語はサニタイズ済みで照合）
pub async fn list_users_handler(
    State(app_state): State<AppState>,
    ApiQuery(query): ApiQuery<UserListQuery>,
) -> AppResult<ApiResponse<PaginatedResponse<UserResponse>>> {
    let users = app_state.user_service.list(&query).await?;
    Ok(ApiResponse::success(users))
}

pub async fn get_user_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = app_state.user_service.get(id).await?;
    Ok(ApiResponse::success(user))
}

pub async fn create_user_handler(
    State(app_state): State<AppState>,
    actor: AuditActor,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = app_state.user_service.create(payload, actor).await?;
    info!(user_id = %user.id, "User created");
    Ok(ApiResponse::created(user))
}

pub async fn update_user_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
    actor: AuditActor,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    ensure_has_updates(payload.has_updates(), "user_handler::update_user")?;
    let user = app_state.user_service.update(id, payload, actor).await?;
    Ok(ApiResponse::success(user))
}

/// 一括ステータス変更。スーパー管理者は対象外として結果に含める
pub async fn bulk_status_handler(
    State(app_state): State<AppState>,
    actor: AuditActor,
    ValidatedJson(payload): ValidatedJson<BulkStatusRequest>,
) -> AppResult<ApiResponse<BulkStatusResponse>> {
    let result = app_state
        .user_service
        .bulk_update_status(payload, actor)
        .await?;
    info!(
        requested = result.requested,
        updated = result.updated,
        skipped = result.skipped_super_admins.len(),
        "Bulk user status change completed"
    );
    Ok(ApiResponse::success(result))
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/superadmin/users",
            get(list_users_handler).post(create_user_handler),
        )
        .route("/api/superadmin/users/bulk-status", post(bulk_status_handler))
        .route(
            "/api/superadmin/users/{id}",
            get(get_user_handler).patch(update_user_handler),
        )
}
