// src/repository/tenant_scope.rs

use crate::domain::tenant::TenantContext;
use crate::domain::{vendor_model, work_order_model};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Select};
use uuid::Uuid;

/// 組織IDを持つエンティティ
///
/// テナントのデータに触れるクエリは必ず `scoped` / `scope_query` を通す。
pub trait TenantScoped: EntityTrait {
    fn org_column() -> Self::Column;

    fn scope_query(select: Select<Self>, ctx: &TenantContext) -> Select<Self> {
        select.filter(Self::org_column().eq(ctx.org_id))
    }

    fn scoped(ctx: &TenantContext) -> Select<Self> {
        Self::scope_query(Self::find(), ctx)
    }

    /// 主キーと組織IDの両方で1件取得するクエリ（他組織のIDは見つからない扱い）
    fn scoped_by_id(ctx: &TenantContext, id: Uuid, id_column: Self::Column) -> Select<Self> {
        Self::scoped(ctx).filter(id_column.eq(id))
    }
}

impl TenantScoped for vendor_model::Entity {
    fn org_column() -> Self::Column {
        vendor_model::Column::OrgId
    }
}

impl TenantScoped for work_order_model::Entity {
    fn org_column() -> Self::Column {
        work_order_model::Column::OrgId
    }
}
