// src/domain/user_model.rs

use crate::domain::role::RoleName;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(nullable)]
    pub org_id: Option<Uuid>,

    #[sea_orm(unique)]
    pub email: String,

    pub full_name: String,

    #[serde(skip_serializing)] // パスワードハッシュは絶対にシリアライズしない
    pub password_hash: String,

    pub role: String,

    #[sea_orm(nullable)]
    pub custom_role_id: Option<Uuid>,

    pub status: String,

    pub last_login_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organization_model::Entity",
        from = "Column::OrgId",
        to = "super::organization_model::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Organization,
    #[sea_orm(
        belongs_to = "super::role_model::Entity",
        from = "Column::CustomRoleId",
        to = "super::role_model::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    CustomRole,
}

impl Related<super::organization_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl Related<super::role_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomRole.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if !insert {
            // 更新の場合のみ updated_at を更新
            self.updated_at = Set(Utc::now());
        }
        Ok(self)
    }
}

string_enum! {
    pub enum UserStatus {
        Active => "active",
        Suspended => "suspended",
        Inactive => "inactive",
    }
}

impl Model {
    /// 保存されているロール文字列を解釈する。不明な値は最小権限のVIEWER扱い
    pub fn role_name(&self) -> RoleName {
        self.role.parse().unwrap_or(RoleName::Viewer)
    }

    pub fn is_super_admin(&self) -> bool {
        self.role_name().is_super_admin()
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: &str, status: &str) -> Model {
        Model {
            id: Uuid::new_v4(),
            org_id: None,
            email: "a@example.com".to_string(),
            full_name: "A".to_string(),
            password_hash: "hash".to_string(),
            role: role.to_string(),
            custom_role_id: None,
            status: status.to_string(),
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_and_status_helpers() {
        assert!(user("SUPER_ADMIN", "active").is_super_admin());
        assert!(!user("FM_MANAGER", "active").is_super_admin());
        assert_eq!(user("garbage", "active").role_name(), RoleName::Viewer);
        assert!(!user("VIEWER", "suspended").is_active());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let json = serde_json::to_value(user("VIEWER", "active")).unwrap();
        assert!(json.get("password_hash").is_none());
    }
}
