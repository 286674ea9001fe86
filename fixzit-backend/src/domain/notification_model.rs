// src/domain/notification_model.rs
use crate::domain::role::RoleName;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// None は全テナント向け
    pub org_id: Option<Uuid>,
    pub title: String,
    pub message: String,
    pub channel: String,
    pub priority: String,
    pub target_roles: Json,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organization_model::Entity",
        from = "Column::OrgId",
        to = "super::organization_model::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Organization,
}

impl Related<super::organization_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

string_enum! {
    pub enum NotificationChannel {
        InApp => "in_app",
        Email => "email",
        Sms => "sms",
        Push => "push",
    }
}

string_enum! {
    pub enum NotificationPriority {
        Low => "low",
        Normal => "normal",
        High => "high",
        Urgent => "urgent",
    }
}

impl Model {
    pub fn target_role_names(&self) -> Vec<RoleName> {
        serde_json::from_value(self.target_roles.clone()).unwrap_or_default()
    }

    /// 対象ロールが空なら全員に表示
    pub fn is_visible_to(&self, role: RoleName) -> bool {
        let targets = self.target_role_names();
        targets.is_empty() || targets.contains(&role)
    }
}
