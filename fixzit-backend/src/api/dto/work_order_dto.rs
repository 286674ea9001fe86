// src/api/dto/work_order_dto.rs
use crate::domain::work_order_model::Model as WorkOrderModel;
use crate::types::PaginationQuery;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWorkOrderRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description must be 5000 characters or less"))]
    pub description: Option<String>,

    #[validate(length(max = 64, message = "Category must be 64 characters or less"))]
    pub category: Option<String>,

    /// 省略時は `medium`
    pub priority: Option<String>,

    pub vendor_id: Option<Uuid>,

    #[validate(length(max = 128, message = "property_ref must be 128 characters or less"))]
    pub property_ref: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateWorkOrderStatusRequest {
    pub status: String,

    /// `assigned` への遷移時に担当ベンダーを指定
    pub vendor_id: Option<Uuid>,

    #[validate(length(max = 1000, message = "Note must be 1000 characters or less"))]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkOrderListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub vendor_id: Option<Uuid>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl WorkOrderListQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkOrderResponse {
    pub id: Uuid,
    pub org_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: String,
    pub status: String,
    pub vendor_id: Option<Uuid>,
    pub property_ref: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<WorkOrderModel> for WorkOrderResponse {
    fn from(wo: WorkOrderModel) -> Self {
        Self {
            id: wo.id,
            org_id: wo.org_id,
            title: wo.title,
            description: wo.description,
            category: wo.category,
            priority: wo.priority,
            status: wo.status,
            vendor_id: wo.vendor_id,
            property_ref: wo.property_ref,
            created_by: wo.created_by,
            created_at: wo.created_at,
            updated_at: wo.updated_at,
        }
    }
}
