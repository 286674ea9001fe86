// src/service/scheduled_task_service.rs
use crate::api::dto::scheduled_task_dto::{
    CreateScheduledTaskRequest, ScheduledTaskListQuery, ScheduledTaskResponse,
    UpdateScheduledTaskRequest,
};
use crate::domain::audit_log_model::{AuditAction, AuditActor, AuditEntry};
use crate::domain::scheduled_task_model::{self, ScheduledTaskType, RUN_STATUS_TRIGGERED};
use crate::error::AppResult;
use crate::repository::scheduled_task_repository::ScheduledTaskRepository;
use crate::service::audit_log_service::AuditLogService;
use crate::utils::error_helper::{conflict_error, not_found_error, parse_field};
use chrono::Utc;
use sea_orm::Set;
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// 定期タスクの定義管理（実行エンジンは持たない）
pub struct ScheduledTaskService {
    task_repo: Arc<ScheduledTaskRepository>,
    audit_service: Arc<AuditLogService>,
}

impl ScheduledTaskService {
    pub fn new(task_repo: Arc<ScheduledTaskRepository>, audit_service: Arc<AuditLogService>) -> Self {
        Self {
            task_repo,
            audit_service,
        }
    }

    pub async fn list(&self, query: &ScheduledTaskListQuery) -> AppResult<Vec<ScheduledTaskResponse>> {
        let task_type = match &query.task_type {
            Some(value) => Some(parse_field::<ScheduledTaskType>("task_type", value)?),
            None => None,
        };
        let tasks = self
            .task_repo
            .list(task_type.as_ref().map(|t| t.as_str()), query.enabled)
            .await?;
        Ok(tasks.into_iter().map(ScheduledTaskResponse::from).collect())
    }

    pub async fn create(
        &self,
        request: CreateScheduledTaskRequest,
        actor: AuditActor,
    ) -> AppResult<ScheduledTaskResponse> {
        let task_type = parse_field::<ScheduledTaskType>("task_type", &request.task_type)?;

        let now = Utc::now();
        let task = self
            .task_repo
            .create(scheduled_task_model::ActiveModel {
                id: Set(Uuid::new_v4()),
                name: Set(request.name.trim().to_string()),
                task_type: Set(task_type.as_str().to_string()),
                cron_expression: Set(normalize_cron(&request.cron_expression)),
                enabled: Set(request.enabled.unwrap_or(true)),
                payload: Set(request.payload),
                last_run_at: Set(None),
                last_run_status: Set(None),
                created_by: Set(actor.user_id),
                created_at: Set(now),
                updated_at: Set(now),
            })
            .await?;

        info!(task_id = %task.id, task_type = %task.task_type, "Scheduled task created");
        self.audit_service
            .record(
                AuditEntry::new(actor, AuditAction::Create, "scheduled_task")
                    .entity_id(task.id)
                    .details(json!({
                        "name": task.name,
                        "task_type": task.task_type,
                        "cron_expression": task.cron_expression,
                    })),
            )
            .await;

        Ok(task.into())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateScheduledTaskRequest,
        actor: AuditActor,
    ) -> AppResult<ScheduledTaskResponse> {
        let current = self.find(id).await?;
        let mut active: scheduled_task_model::ActiveModel = current.into();

        if let Some(name) = request.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(cron) = &request.cron_expression {
            active.cron_expression = Set(normalize_cron(cron));
        }
        if let Some(enabled) = request.enabled {
            active.enabled = Set(enabled);
        }
        if let Some(payload) = request.payload {
            active.payload = Set(Some(payload));
        }

        let task = self.task_repo.update(active).await?;
        self.audit_service
            .record(
                AuditEntry::new(actor, AuditAction::Update, "scheduled_task")
                    .entity_id(task.id)
                    .details(json!({
                        "enabled": task.enabled,
                        "cron_expression": task.cron_expression,
                    })),
            )
            .await;

        Ok(task.into())
    }

    pub async fn delete(&self, id: Uuid, actor: AuditActor) -> AppResult<()> {
        let task = self.find(id).await?;
        self.task_repo.delete(id).await?;

        self.audit_service
            .record(
                AuditEntry::new(actor, AuditAction::Delete, "scheduled_task")
                    .entity_id(id)
                    .details(json!({ "name": task.name })),
            )
            .await;
        Ok(())
    }

    /// 手動実行の記録のみ行う
    pub async fn trigger(&self, id: Uuid, actor: AuditActor) -> AppResult<ScheduledTaskResponse> {
        let current = self.find(id).await?;
        if !current.enabled {
            return Err(conflict_error(
                "Disabled tasks cannot be triggered",
                "scheduled_task_service::trigger",
            ));
        }

        let mut active: scheduled_task_model::ActiveModel = current.into();
        active.last_run_at = Set(Some(Utc::now()));
        active.last_run_status = Set(Some(RUN_STATUS_TRIGGERED.to_string()));
        let task = self.task_repo.update(active).await?;

        info!(task_id = %task.id, task_type = %task.task_type, "Scheduled task triggered manually");
        self.audit_service
            .record(
                AuditEntry::new(actor, AuditAction::Trigger, "scheduled_task")
                    .entity_id(task.id)
                    .details(json!({ "task_type": task.task_type })),
            )
            .await;

        Ok(task.into())
    }

    async fn find(&self, id: Uuid) -> AppResult<scheduled_task_model::Model> {
        self.task_repo.find_by_id(id).await?.ok_or_else(|| {
            not_found_error("Scheduled task", &id.to_string(), "scheduled_task_service::find")
        })
    }
}

/// 連続する空白を1つにまとめる
fn normalize_cron(expression: &str) -> String {
    expression.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_cron() {
        assert_eq!(normalize_cron("  0   3 * *  1 "), "0 3 * * 1");
    }
}
