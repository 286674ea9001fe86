// src/api/handlers/feature_flag_handler.rs
use crate::api::dto::feature_flag_dto::{
    CreateFeatureFlagRequest, FeatureFlagEvaluationResponse, FeatureFlagResponse,
    UpdateFeatureFlagRequest,
};
use crate::api::AppState;
use crate::domain::audit_log_model::AuditActor;
use crate::domain::tenant::TenantContext;
use crate::error::AppResult;
use crate::extractors::{ValidatedJson, ValidatedUuid};
use crate::types::{ApiResponse, DeletedResponse};
use crate::utils::error_helper::ensure_has_updates;
use axum::{
    extract::{Path, State},
    routing::{get, patch},
    Router,
};

pub async fn list_feature_flags_handler(
    State(app_state): State<AppState>,
) -> AppResult<ApiResponse<Vec<FeatureFlagResponse>>> {
    let flags = app_state.feature_flag_service.list().await?;
    Ok(ApiResponse::success(flags))
}

pub async fn create_feature_flag_handler(
    State(app_state): State<AppState>,
    actor: AuditActor,
    ValidatedJson(payload): ValidatedJson<CreateFeatureFlagRequest>,
) -> AppResult<ApiResponse<FeatureFlagResponse>> {
    let flag = app_state
        .feature_flag_service
        .create(payload, actor)
        .await?;
    Ok(ApiResponse::created(flag))
}

pub async fn update_feature_flag_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
    actor: AuditActor,
    ValidatedJson(payload): ValidatedJson<UpdateFeatureFlagRequest>,
) -> AppResult<ApiResponse<FeatureFlagResponse>> {
    ensure_has_updates(payload.has_updates(), "feature_flag_handler::update_feature_flag")?;
    let flag = app_state
        .feature_flag_service
        .update(id, payload, actor)
        .await?;
    Ok(ApiResponse::success(flag))
}

pub async fn delete_feature_flag_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
    actor: AuditActor,
) -> AppResult<ApiResponse<DeletedResponse>> {
    app_state.feature_flag_service.delete(id, actor).await?;
    Ok(ApiResponse::success(DeletedResponse::new(id)))
}

/// 呼び出し元の組織に対するフラグ評価
pub async fn evaluate_feature_flag_handler(
    State(app_state): State<AppState>,
    ctx: TenantContext,
    Path(key): Path<String>,
) -> AppResult<ApiResponse<FeatureFlagEvaluationResponse>> {
    let evaluation = app_state
        .feature_flag_service
        .evaluate(&key, ctx.org_id)
        .await?;
    Ok(ApiResponse::success(evaluation))
}

pub fn feature_flag_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/superadmin/feature-flags",
            get(list_feature_flags_handler).post(create_feature_flag_handler),
        )
        .route(
            "/api/superadmin/feature-flags/{id}",
            patch(update_feature_flag_handler).delete(delete_feature_flag_handler),
        )
}

pub fn feature_flag_tenant_routes() -> Router<AppState> {
    Router::new().route(
        "/api/fm/feature-flags/{key}",
        get(evaluate_feature_flag_handler),
    )
}
