// src/repository/scheduled_task_repository.rs
use crate::domain::scheduled_task_model::{
    self, ActiveModel as ScheduledTaskActiveModel, Entity as ScheduledTaskEntity,
    Model as ScheduledTaskModel,
};
use sea_orm::{entity::*, query::*, DbConn, DbErr};
use uuid::Uuid;

#[derive(Clone)]
pub struct ScheduledTaskRepository {
    db: DbConn,
}

impl ScheduledTaskRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        task: ScheduledTaskActiveModel,
    ) -> Result<ScheduledTaskModel, DbErr> {
        task.insert(&self.db).await
    }

    pub async fn update(
        &self,
        task: ScheduledTaskActiveModel,
    ) -> Result<ScheduledTaskModel, DbErr> {
        task.update(&self.db).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ScheduledTaskModel>, DbErr> {
        ScheduledTaskEntity::find_by_id(id).one(&self.db).await
    }

    pub async fn list(
        &self,
        task_type: Option<&str>,
        enabled: Option<bool>,
    ) -> Result<Vec<ScheduledTaskModel>, DbErr> {
        let mut query = ScheduledTaskEntity::find();
        if let Some(task_type) = task_type {
            query = query.filter(scheduled_task_model::Column::TaskType.eq(task_type));
        }
        if let Some(enabled) = enabled {
            query = query.filter(scheduled_task_model::Column::Enabled.eq(enabled));
        }
        query
            .order_by_asc(scheduled_task_model::Column::Name)
            .all(&self.db)
            .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, DbErr> {
        let result = ScheduledTaskEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }
}
