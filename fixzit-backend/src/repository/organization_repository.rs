// src/repository/organization_repository.rs
use crate::domain::organization_model::{
    self, ActiveModel as OrganizationActiveModel, Entity as OrganizationEntity,
    Model as OrganizationModel,
};
use crate::utils::search::contains_ci;
use sea_orm::sea_query::Condition;
use sea_orm::{entity::*, query::*, DbConn, DbErr};
use uuid::Uuid;

#[derive(Clone)]
pub struct OrganizationRepository {
    db: DbConn,
}

impl OrganizationRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        organization: OrganizationActiveModel,
    ) -> Result<OrganizationModel, DbErr> {
        organization.insert(&self.db).await
    }

    pub async fn update(
        &self,
        organization: OrganizationActiveModel,
    ) -> Result<OrganizationModel, DbErr> {
        organization.update(&self.db).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<OrganizationModel>, DbErr> {
        OrganizationEntity::find_by_id(id).one(&self.db).await
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<OrganizationModel>, DbErr> {
        OrganizationEntity::find()
            .filter(organization_model::Column::Code.eq(code))
            .one(&self.db)
            .await
    }

    pub async fn list(
        &self,
        search: Option<&str>,
        status: Option<&str>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<OrganizationModel>, u64), DbErr> {
        let mut query = OrganizationEntity::find();

        if let Some(term) = search {
            query = query.filter(
                Condition::any()
                    .add(contains_ci(organization_model::Column::Name, term))
                    .add(contains_ci(organization_model::Column::Code, term))
                    .add(contains_ci(organization_model::Column::ContactEmail, term)),
            );
        }
        if let Some(status) = status {
            query = query.filter(organization_model::Column::Status.eq(status));
        }

        let paginator = query
            .order_by_desc(organization_model::Column::CreatedAt)
            .paginate(&self.db, per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    /// 指定IDのうち存在するもの
    pub async fn existing_ids(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        OrganizationEntity::find()
            .select_only()
            .column(organization_model::Column::Id)
            .filter(organization_model::Column::Id.is_in(ids.iter().copied()))
            .into_tuple::<Uuid>()
            .all(&self.db)
            .await
    }
}
