// src/api/handlers/notification_handler.rs
use crate::api::dto::notification_dto::{
    BroadcastResponse, CreateNotificationRequest, NotificationListQuery, NotificationResponse,
};
use crate::api::AppState;
use crate::domain::audit_log_model::AuditActor;
use crate::domain::tenant::TenantContext;
use crate::error::AppResult;
use crate::extractors::{ApiQuery, ValidatedJson};
use crate::types::{ApiResponse, PaginatedResponse};
use axum::{extract::State, routing::get, Router};
use tracing::info;

pub async fn list_notifications_handler(
    State(app_state): State<AppState>,
    ApiQuery(query): ApiQuery<NotificationListQuery>,
) -> AppResult<ApiResponse<PaginatedResponse<NotificationResponse>>> {
    let notifications = app_state.notification_service.list(&query).await?;
    Ok(ApiResponse::success(notifications))
}

/// 対象組織ごとに1件、指定なしなら全テナント向けに1件作成
pub async fn broadcast_notification_handler(
    State(app_state): State<AppState>,
    actor: AuditActor,
    ValidatedJson(payload): ValidatedJson<CreateNotificationRequest>,
) -> AppResult<ApiResponse<BroadcastResponse>> {
    let result = app_state
        .notification_service
        .broadcast(payload, actor)
        .await?;
    info!(created = result.created, "Notification broadcast");
    Ok(ApiResponse::created(result))
}

/// テナント向けの通知フィード
pub async fn tenant_notifications_handler(
    State(app_state): State<AppState>,
    ctx: TenantContext,
) -> AppResult<ApiResponse<Vec<NotificationResponse>>> {
    let notifications = app_state
        .notification_service
        .list_for_tenant(&ctx)
        .await?;
    Ok(ApiResponse::success(notifications))
}

pub fn notification_admin_routes() -> Router<AppState> {
    Router::new().route(
        "/api/superadmin/notifications",
        get(list_notifications_handler).post(broadcast_notification_handler),
    )
}

pub fn notification_tenant_routes() -> Router<AppState> {
    Router::new().route("/api/fm/notifications", get(tenant_notifications_handler))
}
