// src/repository/vendor_repository.rs
use crate::domain::tenant::TenantContext;
use crate::domain::vendor_model::{
    self, ActiveModel as VendorActiveModel, Entity as VendorEntity, Model as VendorModel,
};
use crate::repository::tenant_scope::TenantScoped;
use crate::utils::search::contains_ci;
use sea_orm::sea_query::Condition;
use sea_orm::{entity::*, query::*, DbConn, DbErr};
use uuid::Uuid;

/// ベンダー（常に組織スコープ）
#[derive(Clone)]
pub struct VendorRepository {
    db: DbConn,
}

impl VendorRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn create(&self, vendor: VendorActiveModel) -> Result<VendorModel, DbErr> {
        vendor.insert(&self.db).await
    }

    pub async fn update(&self, vendor: VendorActiveModel) -> Result<VendorModel, DbErr> {
        vendor.update(&self.db).await
    }

    pub async fn find_by_id(
        &self,
        ctx: &TenantContext,
        id: Uuid,
    ) -> Result<Option<VendorModel>, DbErr> {
        VendorEntity::scoped_by_id(ctx, id, vendor_model::Column::Id)
            .one(&self.db)
            .await
    }

    pub async fn list(
        &self,
        ctx: &TenantContext,
        search: Option<&str>,
        is_active: Option<bool>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<VendorModel>, u64), DbErr> {
        let mut query = VendorEntity::scoped(ctx);
        if let Some(term) = search {
            query = query.filter(
                Condition::any()
                    .add(contains_ci(vendor_model::Column::Name, term))
                    .add(contains_ci(vendor_model::Column::Company, term))
                    .add(contains_ci(vendor_model::Column::Specialization, term)),
            );
        }
        if let Some(is_active) = is_active {
            query = query.filter(vendor_model::Column::IsActive.eq(is_active));
        }
        let paginator = query
            .order_by_asc(vendor_model::Column::Name)
            .paginate(&self.db, per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    pub async fn delete(&self, ctx: &TenantContext, id: Uuid) -> Result<u64, DbErr> {
        let result = VendorEntity::delete_many()
            .filter(vendor_model::Column::Id.eq(id))
            .filter(vendor_model::Column::OrgId.eq(ctx.org_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
