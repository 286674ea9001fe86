// src/domain/audit_log_model.rs
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 追記専用の監査ログ
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub actor_id: Option<Uuid>,
    pub actor_email: Option<String>,
    pub actor_role: Option<String>,
    pub org_id: Option<Uuid>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub details: Option<Json>,
    pub result: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// 監査アクションの定義
#[derive(Debug, Clone, PartialEq)]
pub enum AuditAction {
    // 認証
    Login,
    LoginFailed,
    Logout,
    // 作成・更新・削除
    Create,
    Update,
    Delete,
    // 一括操作
    BulkStatusChange,
    StatusChange,
    // 手動実行・テスト送信
    Trigger,
    TestDelivery,
    Broadcast,
    Cleanup,
    Custom(String),
}

impl AuditAction {
    pub fn as_str(&self) -> &str {
        match self {
            AuditAction::Login => "login",
            AuditAction::LoginFailed => "login_failed",
            AuditAction::Logout => "logout",
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
            AuditAction::BulkStatusChange => "bulk_status_change",
            AuditAction::StatusChange => "status_change",
            AuditAction::Trigger => "trigger",
            AuditAction::TestDelivery => "test_delivery",
            AuditAction::Broadcast => "broadcast",
            AuditAction::Cleanup => "cleanup",
            AuditAction::Custom(action) => action,
        }
    }
}

string_enum! {
    pub enum AuditResult {
        Success => "success",
        Failure => "failure",
    }
}

/// 監査ログの操作者情報
#[derive(Debug, Clone, Default)]
pub struct AuditActor {
    pub user_id: Option<Uuid>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

// 監査ログエントリービルダー
#[derive(Debug, Clone)]
pub struct AuditEntry {
    actor: AuditActor,
    action: AuditAction,
    entity_type: String,
    entity_id: Option<String>,
    org_id: Option<Uuid>,
    details: Option<serde_json::Value>,
    result: AuditResult,
}

impl AuditEntry {
    pub fn new(actor: AuditActor, action: AuditAction, entity_type: impl Into<String>) -> Self {
        Self {
            actor,
            action,
            entity_type: entity_type.into(),
            entity_id: None,
            org_id: None,
            details: None,
            result: AuditResult::Success,
        }
    }

    pub fn entity_id(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
        self
    }

    pub fn org_id(mut self, id: Option<Uuid>) -> Self {
        self.org_id = id;
        self
    }

    pub fn details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn result(mut self, result: AuditResult) -> Self {
        self.result = result;
        self
    }

    pub fn build(self) -> ActiveModel {
        ActiveModel {
            id: Set(Uuid::new_v4()),
            actor_id: Set(self.actor.user_id),
            actor_email: Set(self.actor.email),
            actor_role: Set(self.actor.role),
            org_id: Set(self.org_id),
            action: Set(self.action.as_str().to_string()),
            entity_type: Set(self.entity_type),
            entity_id: Set(self.entity_id),
            details: Set(self.details),
            result: Set(self.result.as_str().to_string()),
            ip_address: Set(self.actor.ip_address),
            user_agent: Set(self.actor.user_agent),
            created_at: Set(Utc::now()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_fields() {
        let actor = AuditActor {
            user_id: Some(Uuid::new_v4()),
            email: Some("ops@example.com".to_string()),
            role: Some("SUPER_ADMIN".to_string()),
            ..Default::default()
        };
        let model = AuditEntry::new(actor, AuditAction::Create, "vendor")
            .entity_id("abc")
            .result(AuditResult::Failure)
            .build();

        assert_eq!(model.action.as_ref(), "create");
        assert_eq!(model.entity_type.as_ref(), "vendor");
        assert_eq!(model.entity_id.as_ref(), &Some("abc".to_string()));
        assert_eq!(model.result.as_ref(), "failure");
    }
}
