// src/api/dto/scheduled_task_dto.rs
use crate::domain::scheduled_task_model::Model as ScheduledTaskModel;
use crate::utils::validation::validate_cron_expression;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateScheduledTaskRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    pub task_type: String,

    #[validate(custom(function = validate_cron_expression))]
    pub cron_expression: String,

    pub enabled: Option<bool>,

    pub payload: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateScheduledTaskRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,

    #[validate(custom(function = validate_cron_expression))]
    pub cron_expression: Option<String>,

    pub enabled: Option<bool>,

    pub payload: Option<serde_json::Value>,
}

impl UpdateScheduledTaskRequest {
    pub fn has_updates(&self) -> bool {
        self.name.is_some()
            || self.cron_expression.is_some()
            || self.enabled.is_some()
            || self.payload.is_some()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduledTaskListQuery {
    pub task_type: Option<String>,
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledTaskResponse {
    pub id: Uuid,
    pub name: String,
    pub task_type: String,
    pub cron_expression: String,
    pub enabled: bool,
    pub payload: Option<serde_json::Value>,
    pub last_run_at: Option<DateTime<Utc>>,
    pub last_run_status: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ScheduledTaskModel> for ScheduledTaskResponse {
    fn from(task: ScheduledTaskModel) -> Self {
        Self {
            id: task.id,
            name: task.name,
            task_type: task.task_type,
            cron_expression: task.cron_expression,
            enabled: task.enabled,
            payload: task.payload,
            last_run_at: task.last_run_at,
            last_run_status: task.last_run_status,
            created_by: task.created_by,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}
