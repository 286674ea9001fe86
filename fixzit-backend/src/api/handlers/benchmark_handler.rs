// src/api/handlers/benchmark_handler.rs
use crate::api::dto::benchmark_dto::{
    BenchmarkListQuery, BenchmarkResponse, CompareQuery, CompareResponse, CreateBenchmarkRequest,
};
use crate::api::AppState;
use crate::domain::audit_log_model::AuditActor;
use crate::error::AppResult;
use crate::extractors::{ApiQuery, ValidatedJson, ValidatedUuid};
use crate::types::{ApiResponse, DeletedResponse};
use crate::utils::error_helper::convert_validation_errors;
use axum::{
    extract::State,
    routing::{delete, get},
    Router,
};
use validator::Validate;

pub async fn list_benchmarks_handler(
    State(app_state): State<AppState>,
    ApiQuery(query): ApiQuery<BenchmarkListQuery>,
) -> AppResult<ApiResponse<Vec<BenchmarkResponse>>> {
    let benchmarks = app_state.benchmark_service.list(&query).await?;
    Ok(ApiResponse::success(benchmarks))
}

pub async fn create_benchmark_handler(
    State(app_state): State<AppState>,
    actor: AuditActor,
    ValidatedJson(payload): ValidatedJson<CreateBenchmarkRequest>,
) -> AppResult<ApiResponse<BenchmarkResponse>> {
    let benchmark = app_state
        .benchmark_service
        .create(payload, actor)
        .await?;
    Ok(ApiResponse::created(benchmark))
}

pub async fn delete_benchmark_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
    actor: AuditActor,
) -> AppResult<ApiResponse<DeletedResponse>> {
    app_state.benchmark_service.delete(id, actor).await?;
    Ok(ApiResponse::success(DeletedResponse::new(id)))
}

/// 見積価格を相場と比較する
pub async fn compare_benchmark_handler(
    State(app_state): State<AppState>,
    ApiQuery(query): ApiQuery<CompareQuery>,
) -> AppResult<ApiResponse<CompareResponse>> {
    query
        .validate()
        .map_err(|e| convert_validation_errors(e, "benchmark_handler::compare"))?;

    let comparison = app_state.benchmark_service.compare(&query).await?;
    Ok(ApiResponse::success(comparison))
}

pub fn benchmark_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/superadmin/benchmarks",
            get(list_benchmarks_handler).post(create_benchmark_handler),
        )
        .route(
            "/api/superadmin/benchmarks/compare",
            get(compare_benchmark_handler),
        )
        .route(
            "/api/superadmin/benchmarks/{id}",
            delete(delete_benchmark_handler),
        )
}
