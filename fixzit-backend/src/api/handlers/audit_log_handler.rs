// src/api/handlers/audit_log_handler.rs
use crate::api::dto::audit_log_dto::{
    AuditLogQuery, AuditLogResponse, AuditStatsResponse, CleanupRequest, CleanupResponse,
};
use crate::api::AppState;
use crate::domain::audit_log_model::AuditActor;
use crate::error::AppResult;
use crate::extractors::{ApiQuery, ValidatedJson, ValidatedUuid};
use crate::types::{ApiResponse, PaginatedResponse};
use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use tracing::info;

/// 監査ログ検索（追記専用のため更新・削除のエンドポイントはない）
pub async fn list_audit_logs_handler(
    State(app_state): State<AppState>,
    ApiQuery(query): ApiQuery<AuditLogQuery>,
) -> AppResult<ApiResponse<PaginatedResponse<AuditLogResponse>>> {
    let logs = app_state.audit_log_service.list(&query).await?;
    Ok(ApiResponse::success(logs))
}

pub async fn get_audit_log_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<ApiResponse<AuditLogResponse>> {
    let log = app_state.audit_log_service.get(id).await?;
    Ok(ApiResponse::success(log))
}

pub async fn audit_log_stats_handler(
    State(app_state): State<AppState>,
    ApiQuery(query): ApiQuery<AuditLogQuery>,
) -> AppResult<ApiResponse<AuditStatsResponse>> {
    let stats = app_state.audit_log_service.stats(&query).await?;
    Ok(ApiResponse::success(stats))
}

/// 保持期間を過ぎたログの削除
pub async fn cleanup_audit_logs_handler(
    State(app_state): State<AppState>,
    actor: AuditActor,
    ValidatedJson(payload): ValidatedJson<CleanupRequest>,
) -> AppResult<ApiResponse<CleanupResponse>> {
    let result = app_state
        .audit_log_service
        .cleanup(payload.days_to_keep, actor)
        .await?;
    info!(deleted = result.deleted, "Audit log retention cleanup");
    Ok(ApiResponse::success(result))
}

pub fn audit_log_routes() -> Router<AppState> {
    Router::new()
        .route("/api/superadmin/audit-logs", get(list_audit_logs_handler))
        .route(
            "/api/superadmin/audit-logs/stats",
            get(audit_log_stats_handler),
        )
        .route(
            "/api/superadmin/audit-logs/cleanup",
            post(cleanup_audit_logs_handler),
        )
        .route(
            "/api/superadmin/audit-logs/{id}",
            get(get_audit_log_handler),
        )
}
