// src/repository/notification_repository.rs
use crate::domain::notification_model::{
    self, ActiveModel as NotificationActiveModel, Entity as NotificationEntity,
    Model as NotificationModel,
};
use sea_orm::sea_query::Condition;
use sea_orm::{entity::*, query::*, DbConn, DbErr, TransactionTrait};
use uuid::Uuid;

#[derive(Clone)]
pub struct NotificationRepository {
    db: DbConn,
}

impl NotificationRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// 複数行をまとめて作成（全件成功か全件失敗）
    pub async fn create_many(
        &self,
        notifications: Vec<NotificationActiveModel>,
    ) -> Result<Vec<NotificationModel>, DbErr> {
        let txn = self.db.begin().await?;
        let mut created = Vec::with_capacity(notifications.len());
        for notification in notifications {
            created.push(notification.insert(&txn).await?);
        }
        txn.commit().await?;
        Ok(created)
    }

    pub async fn list(
        &self,
        org_id: Option<Uuid>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<NotificationModel>, u64), DbErr> {
        let mut query = NotificationEntity::find();
        if let Some(org_id) = org_id {
            query = query.filter(notification_model::Column::OrgId.eq(org_id));
        }
        let paginator = query
            .order_by_desc(notification_model::Column::CreatedAt)
            .paginate(&self.db, per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    /// 組織宛と全体宛の通知（新しい順、0始まりのページ）
    pub async fn list_for_org(
        &self,
        org_id: Uuid,
        page: u64,
        per_page: u64,
    ) -> Result<Vec<NotificationModel>, DbErr> {
        NotificationEntity::find()
            .filter(
                Condition::any()
                    .add(notification_model::Column::OrgId.eq(org_id))
                    .add(notification_model::Column::OrgId.is_null()),
            )
            .order_by_desc(notification_model::Column::CreatedAt)
            .order_by_desc(notification_model::Column::Id)
            .paginate(&self.db, per_page)
            .fetch_page(page)
            .await
    }
}
