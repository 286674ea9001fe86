// src/api/handlers/role_handler.rs
use crate::api::dto::role_dto::{
    CreateRoleRequest, RoleMatrixResponse, RoleResponse, UpdateRoleRequest,
};
use crate::api::AppState;
use crate::domain::audit_log_model::AuditActor;
use crate::error::AppResult;
use crate::extractors::{ValidatedJson, ValidatedUuid};
use crate::types::{ApiResponse, DeletedResponse};
use crate::utils::error_helper::ensure_has_updates;
use axum::{extract::State, routing::get, Router};

pub async fn list_roles_handler(
    State(app_state): State<AppState>,
) -> AppResult<ApiResponse<Vec<RoleResponse>>> {
    let roles = app_state.role_service.list().await?;
    Ok(ApiResponse::success(roles))
}

/// 組み込みロールの権限マトリクス
pub async fn role_matrix_handler(
    State(app_state): State<AppState>,
) -> AppResult<ApiResponse<RoleMatrixResponse>> {
    Ok(ApiResponse::success(app_state.role_service.matrix()))
}

pub async fn get_role_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<ApiResponse<RoleResponse>> {
    let role = app_state.role_service.get(id).await?;
    Ok(ApiResponse::success(role))
}

pub async fn create_role_handler(
    State(app_state): State<AppState>,
    actor: AuditActor,
    ValidatedJson(payload): ValidatedJson<CreateRoleRequest>,
) -> AppResult<ApiResponse<RoleResponse>> {
    let role = app_state.role_service.create(payload, actor).await?;
    Ok(ApiResponse::created(role))
}

pub async fn update_role_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
    actor: AuditActor,
    ValidatedJson(payload): ValidatedJson<UpdateRoleRequest>,
) -> AppResult<ApiResponse<RoleResponse>> {
    ensure_has_updates(payload.has_updates(), "role_handler::update_role")?;
    let role = app_state.role_service.update(id, payload, actor).await?;
    Ok(ApiResponse::success(role))
}

/// システムロールは403、利用中のロールは409
pub async fn delete_role_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
    actor: AuditActor,
) -> AppResult<ApiResponse<DeletedResponse>> {
    app_state.role_service.delete(id, actor).await?;
    Ok(ApiResponse::success(DeletedResponse::new(id)))
}

pub fn role_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/superadmin/roles",
            get(list_roles_handler).post(create_role_handler),
        )
        .route("/api/superadmin/roles/matrix", get(role_matrix_handler))
        .route(
            "/api/superadmin/roles/{id}",
            get(get_role_handler)
                .patch(update_role_handler)
                .delete(delete_role_handler),
        )
}
