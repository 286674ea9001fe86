// src/api/handlers/scheduled_task_handler.rs
use crate::api::dto::scheduled_task_dto::{
    CreateScheduledTaskRequest, ScheduledTaskListQuery, ScheduledTaskResponse,
    UpdateScheduledTaskRequest,
};
use crate::api::AppState;
use crate::domain::audit_log_model::AuditActor;
use crate::error::AppResult;
use crate::extractors::{ApiQuery, ValidatedJson, ValidatedUuid};
use crate::types::{ApiResponse, DeletedResponse};
use crate::utils::error_helper::ensure_has_updates;
use axum::{
    extract::State,
    routing::{get, patch, post},
    Router,
};

pub async fn list_scheduled_tasks_handler(
    State(app_state): State<AppState>,
    ApiQuery(query): ApiQuery<ScheduledTaskListQuery>,
) -> AppResult<ApiResponse<Vec<ScheduledTaskResponse>>> {
    let tasks = app_state.scheduled_task_service.list(&query).await?;
    Ok(ApiResponse::success(tasks))
}

pub async fn create_scheduled_task_handler(
    State(app_state): State<AppState>,
    actor: AuditActor,
    ValidatedJson(payload): ValidatedJson<CreateScheduledTaskRequest>,
) -> AppResult<ApiResponse<ScheduledTaskResponse>> {
    let task = app_state
        .scheduled_task_service
        .create(payload, actor)
        .await?;
    Ok(ApiResponse::created(task))
}

pub async fn update_scheduled_task_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
    actor: AuditActor,
    ValidatedJson(payload): ValidatedJson<UpdateScheduledTaskRequest>,
) -> AppResult<ApiResponse<ScheduledTaskResponse>> {
    ensure_has_updates(payload.has_updates(), "scheduled_task_handler::update_scheduled_task")?;
    let task = app_state
        .scheduled_task_service
        .update(id, payload, actor)
        .await?;
    Ok(ApiResponse::success(task))
}

pub async fn delete_scheduled_task_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
    actor: AuditActor,
) -> AppResult<ApiResponse<DeletedResponse>> {
    app_state.scheduled_task_service.delete(id, actor).await?;
    Ok(ApiResponse::success(DeletedResponse::new(id)))
}

/// 手動実行の記録（実行自体は行わない）
pub async fn run_scheduled_task_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
    actor: AuditActor,
) -> AppResult<ApiResponse<ScheduledTaskResponse>> {
    let task = app_state.scheduled_task_service.trigger(id, actor).await?;
    Ok(ApiResponse::success(task))
}

pub fn scheduled_task_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/superadmin/scheduled-tasks",
            get(list_scheduled_tasks_handler).post(create_scheduled_task_handler),
        )
        .route(
            "/api/superadmin/scheduled-tasks/{id}",
            patch(update_scheduled_task_handler).delete(delete_scheduled_task_handler),
        )
        .route(
            "/api/superadmin/scheduled-tasks/{id}/run",
            post(run_scheduled_task_handler),
        )
}
