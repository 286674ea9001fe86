// src/repository/role_repository.rs
use crate::domain::role_model::{
    self, ActiveModel as RoleActiveModel, Entity as RoleEntity, Model as RoleModel,
};
use sea_orm::{entity::*, query::*, DbConn, DbErr};
use uuid::Uuid;

#[derive(Clone)]
pub struct RoleRepository {
    db: DbConn,
}

impl RoleRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn create(&self, role: RoleActiveModel) -> Result<RoleModel, DbErr> {
        role.insert(&self.db).await
    }

    pub async fn update(&self, role: RoleActiveModel) -> Result<RoleModel, DbErr> {
        role.update(&self.db).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<RoleModel>, DbErr> {
        RoleEntity::find_by_id(id).one(&self.db).await
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<RoleModel>, DbErr> {
        RoleEntity::find()
            .filter(role_model::Column::Name.eq(name))
            .one(&self.db)
            .await
    }

    pub async fn find_all(&self) -> Result<Vec<RoleModel>, DbErr> {
        RoleEntity::find()
            .order_by_asc(role_model::Column::Name)
            .all(&self.db)
            .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, DbErr> {
        let result = RoleEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }
}
