// src/repository/benchmark_repository.rs
use crate::domain::pricing_benchmark_model::{
    self, ActiveModel as BenchmarkActiveModel, Entity as BenchmarkEntity, Model as BenchmarkModel,
};
use crate::utils::search::contains_ci;
use sea_orm::sea_query::Condition;
use sea_orm::{entity::*, query::*, DbConn, DbErr};
use uuid::Uuid;

#[derive(Clone)]
pub struct BenchmarkRepository {
    db: DbConn,
}

impl BenchmarkRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn create(&self, benchmark: BenchmarkActiveModel) -> Result<BenchmarkModel, DbErr> {
        benchmark.insert(&self.db).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<BenchmarkModel>, DbErr> {
        BenchmarkEntity::find_by_id(id).one(&self.db).await
    }

    pub async fn find_by_service_code(
        &self,
        service_code: &str,
    ) -> Result<Option<BenchmarkModel>, DbErr> {
        BenchmarkEntity::find()
            .filter(pricing_benchmark_model::Column::ServiceCode.eq(service_code))
            .one(&self.db)
            .await
    }

    /// `search` はサニタイズ済みの語を渡すこと
    pub async fn list(
        &self,
        category: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<BenchmarkModel>, DbErr> {
        let mut query = BenchmarkEntity::find();
        if let Some(category) = category {
            query = query.filter(pricing_benchmark_model::Column::Category.eq(category));
        }
        if let Some(term) = search {
            query = query.filter(
                Condition::any()
                    .add(contains_ci(pricing_benchmark_model::Column::ServiceName, term))
                    .add(contains_ci(pricing_benchmark_model::Column::ServiceCode, term)),
            );
        }
        query
            .order_by_asc(pricing_benchmark_model::Column::Category)
            .order_by_asc(pricing_benchmark_model::Column::ServiceCode)
            .all(&self.db)
            .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, DbErr> {
        let result = BenchmarkEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }
}
