// src/api/handlers/webhook_handler.rs
use crate::api::dto::webhook_dto::{
    CreateWebhookRequest, UpdateWebhookRequest, WebhookListQuery, WebhookResponse,
    WebhookTestResponse,
};
use crate::api::AppState;
use crate::domain::audit_log_model::AuditActor;
use crate::error::AppResult;
use crate::extractors::{ApiQuery, ValidatedJson, ValidatedUuid};
use crate::types::{ApiResponse, DeletedResponse};
use crate::utils::error_helper::ensure_has_updates;
use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use tracing::info;

/// 一覧ではシークレットをマスクして返す
pub async fn list_webhooks_handler(
    State(app_state): State<AppState>,
    ApiQuery(query): ApiQuery<WebhookListQuery>,
) -> AppResult<ApiResponse<Vec<WebhookResponse>>> {
    let webhooks = app_state.webhook_service.list(&query).await?;
    Ok(ApiResponse::success(webhooks))
}

pub async fn get_webhook_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<ApiResponse<WebhookResponse>> {
    let webhook = app_state.webhook_service.get(id).await?;
    Ok(ApiResponse::success(webhook))
}

/// 作成時のみシークレットを平文で返す
pub async fn create_webhook_handler(
    State(app_state): State<AppState>,
    actor: AuditActor,
    ValidatedJson(payload): ValidatedJson<CreateWebhookRequest>,
) -> AppResult<ApiResponse<WebhookResponse>> {
    let webhook = app_state.webhook_service.create(payload, actor).await?;
    Ok(ApiResponse::created(webhook))
}

pub async fn update_webhook_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
    actor: AuditActor,
    ValidatedJson(payload): ValidatedJson<UpdateWebhookRequest>,
) -> AppResult<ApiResponse<WebhookResponse>> {
    ensure_has_updates(payload.has_updates(), "webhook_handler::update_webhook")?;
    let webhook = app_state
        .webhook_service
        .update(id, payload, actor)
        .await?;
    Ok(ApiResponse::success(webhook))
}

pub async fn delete_webhook_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
    actor: AuditActor,
) -> AppResult<ApiResponse<DeletedResponse>> {
    app_state.webhook_service.delete(id, actor).await?;
    Ok(ApiResponse::success(DeletedResponse::new(id)))
}

/// テスト配信。配信失敗は `delivered: false` として200で返す
pub async fn test_webhook_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
    actor: AuditActor,
) -> AppResult<ApiResponse<WebhookTestResponse>> {
    let result = app_state.webhook_service.send_test(id, actor).await?;
    info!(
        webhook_id = %id,
        delivered = result.delivered,
        status_code = ?result.status_code,
        "Webhook test delivery finished"
    );
    Ok(ApiResponse::success(result))
}

pub fn webhook_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/superadmin/webhooks",
            get(list_webhooks_handler).post(create_webhook_handler),
        )
        .route(
            "/api/superadmin/webhooks/{id}",
            get(get_webhook_handler)
                .patch(update_webhook_handler)
                .delete(delete_webhook_handler),
        )
        .route("/api/superadmin/webhooks/{id}/test", post(test_webhook_handler))
}
