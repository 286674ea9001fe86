// src/repository/audit_log_repository.rs
use crate::domain::audit_log_model::{
    self, ActiveModel as AuditLogActiveModel, Entity as AuditLogEntity, Model as AuditLogModel,
};
use crate::utils::search::contains_ci;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Condition, Expr};
use sea_orm::{entity::*, query::*, DbConn, DbErr};
use uuid::Uuid;

/// 監査ログ検索条件（searchはサニタイズ済みの値）
#[derive(Debug, Clone, Default)]
pub struct AuditLogFilter {
    pub actor_id: Option<Uuid>,
    pub org_id: Option<Uuid>,
    pub action: Option<String>,
    pub entity_type: Option<String>,
    pub result: Option<String>,
    pub search: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct AuditLogRepository {
    db: DbConn,
}

impl AuditLogRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    // 監査ログの作成（更新・削除APIは持たない）
    pub async fn create(&self, audit_log: AuditLogActiveModel) -> Result<AuditLogModel, DbErr> {
        audit_log.insert(&self.db).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<AuditLogModel>, DbErr> {
        AuditLogEntity::find_by_id(id).one(&self.db).await
    }

    fn filtered(filter: &AuditLogFilter) -> Select<AuditLogEntity> {
        let mut query = AuditLogEntity::find();

        if let Some(actor_id) = filter.actor_id {
            query = query.filter(audit_log_model::Column::ActorId.eq(actor_id));
        }
        if let Some(org_id) = filter.org_id {
            query = query.filter(audit_log_model::Column::OrgId.eq(org_id));
        }
        if let Some(action) = &filter.action {
            query = query.filter(audit_log_model::Column::Action.eq(action.as_str()));
        }
        if let Some(entity_type) = &filter.entity_type {
            query = query.filter(audit_log_model::Column::EntityType.eq(entity_type.as_str()));
        }
        if let Some(result) = &filter.result {
            query = query.filter(audit_log_model::Column::Result.eq(result.as_str()));
        }
        if let Some(from) = filter.from {
            query = query.filter(audit_log_model::Column::CreatedAt.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(audit_log_model::Column::CreatedAt.lte(to));
        }
        if let Some(term) = &filter.search {
            query = query.filter(
                Condition::any()
                    .add(contains_ci(audit_log_model::Column::Action, term))
                    .add(contains_ci(audit_log_model::Column::EntityType, term))
                    .add(contains_ci(audit_log_model::Column::ActorEmail, term)),
            );
        }
        query
    }

    pub async fn list(
        &self,
        filter: &AuditLogFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<AuditLogModel>, u64), DbErr> {
        let paginator = Self::filtered(filter)
            .order_by_desc(audit_log_model::Column::CreatedAt)
            .paginate(&self.db, per_page);

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    /// 指定カラムでグループ化した件数
    async fn count_grouped_by(
        &self,
        column: audit_log_model::Column,
        filter: &AuditLogFilter,
    ) -> Result<Vec<(String, i64)>, DbErr> {
        Self::filtered(filter)
            .select_only()
            .column(column)
            .column_as(Expr::col(audit_log_model::Column::Id).count(), "count")
            .group_by(column)
            .order_by_asc(column)
            .into_tuple::<(String, i64)>()
            .all(&self.db)
            .await
    }

    pub async fn count_by_action(
        &self,
        filter: &AuditLogFilter,
    ) -> Result<Vec<(String, i64)>, DbErr> {
        self.count_grouped_by(audit_log_model::Column::Action, filter)
            .await
    }

    pub async fn count_by_result(
        &self,
        filter: &AuditLogFilter,
    ) -> Result<Vec<(String, i64)>, DbErr> {
        self.count_grouped_by(audit_log_model::Column::Result, filter)
            .await
    }

    pub async fn count(&self, filter: &AuditLogFilter) -> Result<u64, DbErr> {
        Self::filtered(filter).count(&self.db).await
    }

    // 保持期間を過ぎたログの削除
    pub async fn delete_older_than(&self, before: DateTime<Utc>) -> Result<u64, DbErr> {
        let result = AuditLogEntity::delete_many()
            .filter(audit_log_model::Column::CreatedAt.lt(before))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
