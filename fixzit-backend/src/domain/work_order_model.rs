// src/domain/work_order_model.rs
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "work_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub org_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: String,
    pub status: String,
    pub vendor_id: Option<Uuid>,
    pub property_ref: Option<String>,
    pub created_by: Uuid,
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
        on_delete = "Cascade"
    )]
    Organization,
    #[sea_orm(
        belongs_to = "super::vendor_model::Entity",
        from = "Column::VendorId",
        to = "super::vendor_model::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Vendor,
}

impl Related<super::organization_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl Related<super::vendor_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendor.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if !insert {
            self.updated_at = Set(Utc::now());
        }
        Ok(self)
    }
}

string_enum! {
    pub enum WorkOrderPriority {
        Low => "low",
        Medium => "medium",
        High => "high",
        Urgent => "urgent",
    }
}

string_enum! {
    pub enum WorkOrderStatus {
        Open => "open",
        Assigned => "assigned",
        InProgress => "in_progress",
        OnHold => "on_hold",
        Completed => "completed",
        Closed => "closed",
        Cancelled => "cancelled",
    }
}

impl WorkOrderStatus {
    /// 遷移可能な次の状態
    pub fn allowed_transitions(&self) -> &'static [WorkOrderStatus] {
        use WorkOrderStatus::*;
        match self {
            Open => &[Assigned, InProgress, OnHold, Cancelled],
            Assigned => &[Open, InProgress, OnHold, Cancelled],
            InProgress => &[OnHold, Completed, Cancelled],
            OnHold => &[Assigned, InProgress, Cancelled],
            // 完了後は再開かクローズのみ
            Completed => &[InProgress, Closed],
            Closed | Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, next: WorkOrderStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        assert!(WorkOrderStatus::Open.can_transition_to(WorkOrderStatus::Assigned));
        assert!(WorkOrderStatus::InProgress.can_transition_to(WorkOrderStatus::Completed));
        assert!(!WorkOrderStatus::Open.can_transition_to(WorkOrderStatus::Completed));
        assert!(!WorkOrderStatus::Closed.can_transition_to(WorkOrderStatus::Open));
        assert!(WorkOrderStatus::Cancelled.is_terminal());
        assert!(!WorkOrderStatus::Completed.is_terminal());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(
            "in_progress".parse::<WorkOrderStatus>().unwrap(),
            WorkOrderStatus::InProgress
        );
        let err = "done".parse::<WorkOrderStatus>().unwrap_err();
        assert!(err.contains("expected one of"));
    }
}
