// src/repository/user_repository.rs
use crate::domain::role::RoleName;
use crate::domain::user_model::{
    self, ActiveModel as UserActiveModel, Entity as UserEntity, Model as UserModel,
};
use crate::utils::search::contains_ci;
use chrono::Utc;
use sea_orm::sea_query::{Condition, Expr};
use sea_orm::{entity::*, query::*, DbConn, DbErr};
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub search: Option<String>,
    pub org_id: Option<Uuid>,
    pub role: Option<String>,
    pub status: Option<String>,
}

#[derive(Clone)]
pub struct UserRepository {
    db: DbConn,
}

impl UserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn create(&self, user: UserActiveModel) -> Result<UserModel, DbErr> {
        user.insert(&self.db).await
    }

    pub async fn update(&self, user: UserActiveModel) -> Result<UserModel, DbErr> {
        user.update(&self.db).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserModel>, DbErr> {
        UserEntity::find_by_id(id).one(&self.db).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, DbErr> {
        UserEntity::find()
            .filter(user_model::Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await
    }

    pub async fn list(
        &self,
        filter: &UserFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<UserModel>, u64), DbErr> {
        let mut query = UserEntity::find();

        if let Some(term) = &filter.search {
            query = query.filter(
                Condition::any()
                    .add(contains_ci(user_model::Column::Email, term))
                    .add(contains_ci(user_model::Column::FullName, term)),
            );
        }
        if let Some(org_id) = filter.org_id {
            query = query.filter(user_model::Column::OrgId.eq(org_id));
        }
        if let Some(role) = &filter.role {
            query = query.filter(user_model::Column::Role.eq(role.as_str()));
        }
        if let Some(status) = &filter.status {
            query = query.filter(user_model::Column::Status.eq(status.as_str()));
        }

        let paginator = query
            .order_by_desc(user_model::Column::CreatedAt)
            .paginate(&self.db, per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserModel>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        UserEntity::find()
            .filter(user_model::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
    }

    /// 一括でステータスを更新する。スーパー管理者はクエリ側でも除外する
    pub async fn update_status_many(&self, ids: &[Uuid], status: &str) -> Result<u64, DbErr> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = UserEntity::update_many()
            .col_expr(user_model::Column::Status, Expr::value(status))
            .col_expr(user_model::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(user_model::Column::Id.is_in(ids.iter().copied()))
            .filter(user_model::Column::Role.ne(RoleName::SuperAdmin.as_str()))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn count_by_custom_role(&self, role_id: Uuid) -> Result<u64, DbErr> {
        UserEntity::find()
            .filter(user_model::Column::CustomRoleId.eq(role_id))
            .count(&self.db)
            .await
    }

    pub async fn count_by_org(&self, org_id: Uuid) -> Result<u64, DbErr> {
        UserEntity::find()
            .filter(user_model::Column::OrgId.eq(org_id))
            .count(&self.db)
            .await
    }

    pub async fn touch_last_login(&self, id: Uuid) -> Result<(), DbErr> {
        UserEntity::update_many()
            .col_expr(user_model::Column::LastLoginAt, Expr::value(Utc::now()))
            .filter(user_model::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
