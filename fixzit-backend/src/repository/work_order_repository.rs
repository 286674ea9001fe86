// src/repository/work_order_repository.rs
use crate::domain::tenant::TenantContext;
use crate::domain::work_order_model::{
    self, ActiveModel as WorkOrderActiveModel, Entity as WorkOrderEntity, Model as WorkOrderModel,
};
use crate::repository::tenant_scope::TenantScoped;
use crate::utils::search::contains_ci;
use sea_orm::sea_query::Condition;
use sea_orm::{entity::*, query::*, DbConn, DbErr};
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct WorkOrderFilter {
    pub search: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub vendor_id: Option<Uuid>,
}

#[derive(Clone)]
pub struct WorkOrderRepository {
    db: DbConn,
}

impl WorkOrderRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn create(&self, work_order: WorkOrderActiveModel) -> Result<WorkOrderModel, DbErr> {
        work_order.insert(&self.db).await
    }

    pub async fn update(&self, work_order: WorkOrderActiveModel) -> Result<WorkOrderModel, DbErr> {
        work_order.update(&self.db).await
    }

    pub async fn find_by_id(
        &self,
        ctx: &TenantContext,
        id: Uuid,
    ) -> Result<Option<WorkOrderModel>, DbErr> {
        WorkOrderEntity::scoped_by_id(ctx, id, work_order_model::Column::Id)
            .one(&self.db)
            .await
    }

    pub async fn list(
        &self,
        ctx: &TenantContext,
        filter: &WorkOrderFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<WorkOrderModel>, u64), DbErr> {
        let mut query = WorkOrderEntity::scoped(ctx);
        if let Some(term) = &filter.search {
            query = query.filter(
                Condition::any()
                    .add(contains_ci(work_order_model::Column::Title, term))
                    .add(contains_ci(work_order_model::Column::Description, term))
                    .add(contains_ci(work_order_model::Column::PropertyRef, term)),
            );
        }
        if let Some(status) = &filter.status {
            query = query.filter(work_order_model::Column::Status.eq(status.as_str()));
        }
        if let Some(priority) = &filter.priority {
            query = query.filter(work_order_model::Column::Priority.eq(priority.as_str()));
        }
        if let Some(vendor_id) = filter.vendor_id {
            query = query.filter(work_order_model::Column::VendorId.eq(vendor_id));
        }
        let paginator = query
            .order_by_desc(work_order_model::Column::CreatedAt)
            .paginate(&self.db, per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }
}
