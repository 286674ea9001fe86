// src/repository/feature_flag_repository.rs
use crate::domain::feature_flag_model::{
    self, ActiveModel as FeatureFlagActiveModel, Entity as FeatureFlagEntity,
    Model as FeatureFlagModel,
};
use sea_orm::{entity::*, query::*, DbConn, DbErr};
use uuid::Uuid;

#[derive(Clone)]
pub struct FeatureFlagRepository {
    db: DbConn,
}

impl FeatureFlagRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn create(&self, flag: FeatureFlagActiveModel) -> Result<FeatureFlagModel, DbErr> {
        flag.insert(&self.db).await
    }

    pub async fn update(&self, flag: FeatureFlagActiveModel) -> Result<FeatureFlagModel, DbErr> {
        flag.update(&self.db).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<FeatureFlagModel>, DbErr> {
        FeatureFlagEntity::find_by_id(id).one(&self.db).await
    }

    pub async fn find_by_key(&self, key: &str) -> Result<Option<FeatureFlagModel>, DbErr> {
        FeatureFlagEntity::find()
            .filter(feature_flag_model::Column::Key.eq(key))
            .one(&self.db)
            .await
    }

    pub async fn find_all(&self) -> Result<Vec<FeatureFlagModel>, DbErr> {
        FeatureFlagEntity::find()
            .order_by_asc(feature_flag_model::Column::Key)
            .all(&self.db)
            .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, DbErr> {
        let result = FeatureFlagEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }
}
