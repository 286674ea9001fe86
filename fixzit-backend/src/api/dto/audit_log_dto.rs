// src/api/dto/audit_log_dto.rs
use crate::domain::audit_log_model::Model as AuditLogModel;
use crate::types::PaginationQuery;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// 監査ログ検索クエリ
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditLogQuery {
    pub actor_id: Option<Uuid>,
    pub org_id: Option<Uuid>,
    pub action: Option<String>,
    pub entity_type: Option<String>,
    pub result: Option<String>,
    pub search: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl AuditLogQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CleanupRequest {
    #[validate(range(min = 30, max = 3650, message = "days_to_keep must be between 30 and 3650"))]
    pub days_to_keep: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupResponse {
    pub deleted: u64,
    pub cutoff: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogResponse {
    pub id: Uuid,
    pub actor_id: Option<Uuid>,
    pub actor_email: Option<String>,
    pub actor_role: Option<String>,
    pub org_id: Option<Uuid>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub details: Option<serde_json::Value>,
    pub result: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<AuditLogModel> for AuditLogResponse {
    fn from(log: AuditLogModel) -> Self {
        Self {
            id: log.id,
            actor_id: log.actor_id,
            actor_email: log.actor_email,
            actor_role: log.actor_role,
            org_id: log.org_id,
            action: log.action,
            entity_type: log.entity_type,
            entity_id: log.entity_id,
            details: log.details,
            result: log.result,
            ip_address: log.ip_address,
            user_agent: log.user_agent,
            created_at: log.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountEntry {
    pub key: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditStatsResponse {
    pub total: u64,
    pub by_action: Vec<CountEntry>,
    pub by_result: Vec<CountEntry>,
}
