// src/api/dto/benchmark_dto.rs
use crate::domain::pricing_benchmark_model::{Model as BenchmarkModel, PricePosition};
use crate::utils::validation::validate_slug;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBenchmarkRequest {
    #[validate(length(min = 1, max = 64, message = "Category must be between 1 and 64 characters"))]
    pub category: String,

    #[validate(custom(function = validate_slug))]
    pub service_code: String,

    #[validate(length(min = 1, max = 200, message = "Service name must be between 1 and 200 characters"))]
    pub service_name: String,

    #[validate(length(min = 1, max = 100, message = "Unit description must be between 1 and 100 characters"))]
    pub unit_description: String,

    pub min_price: f64,
    pub typical_price: f64,
    pub max_price: f64,

    #[validate(length(max = 1000, message = "Notes must be 1000 characters or less"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BenchmarkListQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CompareQuery {
    #[validate(length(min = 1, max = 64, message = "service_code is required"))]
    pub service_code: String,

    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResponse {
    pub id: Uuid,
    pub category: String,
    pub service_code: String,
    pub service_name: String,
    pub unit_description: String,
    pub min_price: f64,
    pub typical_price: f64,
    pub max_price: f64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<BenchmarkModel> for BenchmarkResponse {
    fn from(b: BenchmarkModel) -> Self {
        Self {
            id: b.id,
            category: b.category,
            service_code: b.service_code,
            service_name: b.service_name,
            unit_description: b.unit_description,
            min_price: b.min_price,
            typical_price: b.typical_price,
            max_price: b.max_price,
            notes: b.notes,
            created_at: b.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareResponse {
    pub service_code: String,
    pub service_name: String,
    pub price: f64,
    pub min_price: f64,
    pub typical_price: f64,
    pub max_price: f64,
    pub position: PricePosition,
    /// 標準価格からの乖離率（%）
    pub deviation_percent: Option<f64>,
}
