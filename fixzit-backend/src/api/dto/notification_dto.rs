// src/api/dto/notification_dto.rs
use crate::domain::notification_model::Model as NotificationModel;
use crate::domain::role::RoleName;
use crate::types::PaginationQuery;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// 通知の一斉送信。`org_ids` が空なら全テナント向けに1件
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateNotificationRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 5000, message = "Message must be between 1 and 5000 characters"))]
    pub message: String,

    pub channel: Option<String>,

    pub priority: Option<String>,

    #[validate(length(max = 500, message = "org_ids must contain at most 500 ids"))]
    pub org_ids: Option<Vec<Uuid>>,

    pub target_roles: Option<Vec<RoleName>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationListQuery {
    pub org_id: Option<Uuid>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl NotificationListQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub id: Uuid,
    pub org_id: Option<Uuid>,
    pub title: String,
    pub message: String,
    pub channel: String,
    pub priority: String,
    pub target_roles: Vec<RoleName>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationModel> for NotificationResponse {
    fn from(notification: NotificationModel) -> Self {
        Self {
            target_roles: notification.target_role_names(),
            id: notification.id,
            org_id: notification.org_id,
            title: notification.title,
            message: notification.message,
            channel: notification.channel,
            priority: notification.priority,
            created_by: notification.created_by,
            created_at: notification.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastResponse {
    pub created: usize,
    pub notifications: Vec<NotificationResponse>,
}
