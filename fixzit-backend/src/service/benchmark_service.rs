// src/service/benchmark_service.rs
use crate::api::dto::benchmark_dto::{
    BenchmarkListQuery, BenchmarkResponse, CompareQuery, CompareResponse, CreateBenchmarkRequest,
};
use crate::domain::audit_log_model::{AuditAction, AuditActor, AuditEntry};
use crate::domain::pricing_benchmark_model::{self, check_price_range};
use crate::error::AppResult;
use crate::repository::benchmark_repository::BenchmarkRepository;
use crate::service::audit_log_service::AuditLogService;
use crate::utils::error_helper::{conflict_error, not_found_error, validation_error};
use crate::utils::search::sanitize_search;
use chrono::Utc;
use sea_orm::Set;
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// 市場価格ベンチマーク
pub struct BenchmarkService {
    benchmark_repo: Arc<BenchmarkRepository>,
    audit_service: Arc<AuditLogService>,
}

impl BenchmarkService {
    pub fn new(benchmark_repo: Arc<BenchmarkRepository>, audit_service: Arc<AuditLogService>) -> Self {
        Self {
            benchmark_repo,
            audit_service,
        }
    }

    pub async fn list(&self, query: &BenchmarkListQuery) -> AppResult<Vec<BenchmarkResponse>> {
        let category = query
            .category
            .as_deref()
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty());
        let search = query.search.as_deref().and_then(sanitize_search);

        let benchmarks = self
            .benchmark_repo
            .list(category.as_deref(), search.as_deref())
            .await?;
        Ok(benchmarks.into_iter().map(BenchmarkResponse::from).collect())
    }

    pub async fn create(
        &self,
        request: CreateBenchmarkRequest,
        actor: AuditActor,
    ) -> AppResult<BenchmarkResponse> {
        check_price_range(request.min_price, request.typical_price, request.max_price)
            .map_err(|message| validation_error("typical_price", &message))?;

        if self
            .benchmark_repo
            .find_by_service_code(&request.service_code)
            .await?
            .is_some()
        {
            return Err(conflict_error(
                &format!("Benchmark for '{}' already exists", request.service_code),
                "benchmark_service::create",
            ));
        }

        let benchmark = self
            .benchmark_repo
            .create(pricing_benchmark_model::ActiveModel {
                id: Set(Uuid::new_v4()),
                category: Set(request.category.trim().to_lowercase()),
                service_code: Set(request.service_code),
                service_name: Set(request.service_name.trim().to_string()),
                unit_description: Set(request.unit_description.trim().to_string()),
                min_price: Set(request.min_price),
                typical_price: Set(request.typical_price),
                max_price: Set(request.max_price),
                notes: Set(request.notes),
                created_at: Set(Utc::now()),
            })
            .await?;

        info!(service_code = %benchmark.service_code, "Pricing benchmark created");
        self.audit_service
            .record(
                AuditEntry::new(actor, AuditAction::Create, "pricing_benchmark")
                    .entity_id(benchmark.id)
                    .details(json!({
                        "service_code": benchmark.service_code,
                        "min_price": benchmark.min_price,
                        "typical_price": benchmark.typical_price,
                        "max_price": benchmark.max_price,
                    })),
            )
            .await;

        Ok(benchmark.into())
    }

    pub async fn delete(&self, id: Uuid, actor: AuditActor) -> AppResult<()> {
        let benchmark = self.benchmark_repo.find_by_id(id).await?.ok_or_else(|| {
            not_found_error("Benchmark", &id.to_string(), "benchmark_service::delete")
        })?;
        self.benchmark_repo.delete(id).await?;

        self.audit_service
            .record(
                AuditEntry::new(actor, AuditAction::Delete, "pricing_benchmark")
                    .entity_id(id)
                    .details(json!({ "service_code": benchmark.service_code })),
            )
            .await;
        Ok(())
    }

    /// 提示価格が相場のどこに位置するか
    pub async fn compare(&self, query: &CompareQuery) -> AppResult<CompareResponse> {
        let code = query.service_code.trim();
        let benchmark = self
            .benchmark_repo
            .find_by_service_code(code)
            .await?
            .ok_or_else(|| not_found_error("Benchmark", code, "benchmark_service::compare"))?;

        Ok(CompareResponse {
            position: benchmark.position_of(query.price),
            deviation_percent: benchmark.deviation_percent(query.price),
            price: query.price,
            min_price: benchmark.min_price,
            typical_price: benchmark.typical_price,
            max_price: benchmark.max_price,
            service_code: benchmark.service_code,
            service_name: benchmark.service_name,
        })
    }
}
