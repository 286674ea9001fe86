// src/repository/webhook_repository.rs
use crate::domain::webhook_model::{
    self, ActiveModel as WebhookActiveModel, Entity as WebhookEntity, Model as WebhookModel,
};
use sea_orm::{entity::*, query::*, DbConn, DbErr};
use uuid::Uuid;

#[derive(Clone)]
pub struct WebhookRepository {
    db: DbConn,
}

impl WebhookRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn create(&self, webhook: WebhookActiveModel) -> Result<WebhookModel, DbErr> {
        webhook.insert(&self.db).await
    }

    pub async fn update(&self, webhook: WebhookActiveModel) -> Result<WebhookModel, DbErr> {
        webhook.update(&self.db).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<WebhookModel>, DbErr> {
        WebhookEntity::find_by_id(id).one(&self.db).await
    }

    pub async fn list(&self, org_id: Option<Uuid>) -> Result<Vec<WebhookModel>, DbErr> {
        let mut query = WebhookEntity::find();
        if let Some(org_id) = org_id {
            query = query.filter(webhook_model::Column::OrgId.eq(org_id));
        }
        query
            .order_by_desc(webhook_model::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, DbErr> {
        let result = WebhookEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }
}
