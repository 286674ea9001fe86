// src/api/handlers/work_order_handler.rs
use crate::api::dto::work_order_dto::{
    CreateWorkOrderRequest, UpdateWorkOrderStatusRequest, WorkOrderListQuery, WorkOrderResponse,
};
use crate::api::AppState;
use crate::domain::audit_log_model::AuditActor;
use crate::domain::capability::{Action, Module};
use crate::domain::tenant::TenantContext;
use crate::error::AppResult;
use crate::extractors::{ApiQuery, ValidatedJson, ValidatedUuid};
use crate::require_capability;
use crate::types::{ApiResponse, PaginatedResponse};
use axum::{
    extract::State,
    routing::{get, patch, post},
    Router,
};
use tracing::info;

pub async fn list_work_orders_handler(
    State(app_state): State<AppState>,
    ctx: TenantContext,
    ApiQuery(query): ApiQuery<WorkOrderListQuery>,
) -> AppResult<ApiResponse<PaginatedResponse<WorkOrderResponse>>> {
    let work_orders = app_state.work_order_service.list(&ctx, &query).await?;
    Ok(ApiResponse::success(work_orders))
}

pub async fn get_work_order_handler(
    State(app_state): State<AppState>,
    ctx: TenantContext,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<ApiResponse<WorkOrderResponse>> {
    let work_order = app_state.work_order_service.get(&ctx, id).await?;
    Ok(ApiResponse::success(work_order))
}

pub async fn create_work_order_handler(
    State(app_state): State<AppState>,
    ctx: TenantContext,
    actor: AuditActor,
    ValidatedJson(payload): ValidatedJson<CreateWorkOrderRequest>,
) -> AppResult<ApiResponse<WorkOrderResponse>> {
    let work_order = app_state
        .work_order_service
        .create(&ctx, payload, actor)
        .await?;
    info!(work_order_id = %work_order.id, org_id = %ctx.org_id, "Work order created");
    Ok(ApiResponse::created(work_order))
}

/// ステータス遷移。不正な遷移は409
pub async fn update_work_order_status_handler(
    State(app_state): State<AppState>,
    ctx: TenantContext,
    ValidatedUuid(id): ValidatedUuid,
    actor: AuditActor,
    ValidatedJson(payload): ValidatedJson<UpdateWorkOrderStatusRequest>,
) -> AppResult<ApiResponse<WorkOrderResponse>> {
    let work_order = app_state
        .work_order_service
        .update_status(&ctx, id, payload, actor)
        .await?;
    Ok(ApiResponse::success(work_order))
}

pub fn work_order_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/fm/work-orders",
            get(list_work_orders_handler)
                .route_layer(require_capability!(Module::WorkOrder, Action::View)),
        )
        .route(
            "/api/fm/work-orders",
            post(create_work_order_handler)
                .route_layer(require_capability!(Module::WorkOrder, Action::Create)),
        )
        .route(
            "/api/fm/work-orders/{id}",
            get(get_work_order_handler)
                .route_layer(require_capability!(Module::WorkOrder, Action::View)),
        )
        .route(
            "/api/fm/work-orders/{id}/status",
            patch(update_work_order_status_handler)
                .route_layer(require_capability!(Module::WorkOrder, Action::Update)),
        )
}
