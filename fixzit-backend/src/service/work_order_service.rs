// src/service/work_order_service.rs
use crate::api::dto::work_order_dto::{
    CreateWorkOrderRequest, UpdateWorkOrderStatusRequest, WorkOrderListQuery, WorkOrderResponse,
};
use crate::domain::audit_log_model::{AuditAction, AuditActor, AuditEntry};
use crate::domain::tenant::TenantContext;
use crate::domain::work_order_model::{self, WorkOrderPriority, WorkOrderStatus};
use crate::error::AppResult;
use crate::repository::vendor_repository::VendorRepository;
use crate::repository::work_order_repository::{WorkOrderFilter, WorkOrderRepository};
use crate::service::audit_log_service::AuditLogService;
use crate::types::PaginatedResponse;
use crate::utils::error_helper::{conflict_error, not_found_error, parse_field, validation_error};
use crate::utils::search::sanitize_search;
use chrono::Utc;
use sea_orm::Set;
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct WorkOrderService {
    work_order_repo: Arc<WorkOrderRepository>,
    vendor_repo: Arc<VendorRepository>,
    audit_service: Arc<AuditLogService>,
}

impl WorkOrderService {
    pub fn new(
        work_order_repo: Arc<WorkOrderRepository>,
        vendor_repo: Arc<VendorRepository>,
        audit_service: Arc<AuditLogService>,
    ) -> Self {
        Self {
            work_order_repo,
            vendor_repo,
            audit_service,
        }
    }

    pub async fn list(
        &self,
        ctx: &TenantContext,
        query: &WorkOrderListQuery,
    ) -> AppResult<PaginatedResponse<WorkOrderResponse>> {
        let status = match &query.status {
            Some(value) => Some(parse_field::<WorkOrderStatus>("status", value)?),
            None => None,
        };
        let priority = match &query.priority {
            Some(value) => Some(parse_field::<WorkOrderPriority>("priority", value)?),
            None => None,
        };
        let filter = WorkOrderFilter {
            search: query.search.as_deref().and_then(sanitize_search),
            status: status.map(|s| s.as_str().to_string()),
            priority: priority.map(|p| p.as_str().to_string()),
            vendor_id: query.vendor_id,
        };
        let (page, per_page) = query.pagination().get_pagination();

        let (orders, total) = self
            .work_order_repo
            .list(ctx, &filter, page, per_page)
            .await?;
        let items = orders.into_iter().map(WorkOrderResponse::from).collect();
        Ok(PaginatedResponse::new(items, page, per_page, total))
    }

    pub async fn get(&self, ctx: &TenantContext, id: Uuid) -> AppResult<WorkOrderResponse> {
        Ok(self.find(ctx, id).await?.into())
    }

    pub async fn create(
        &self,
        ctx: &TenantContext,
        request: CreateWorkOrderRequest,
        actor: AuditActor,
    ) -> AppResult<WorkOrderResponse> {
        let priority = match &request.priority {
            Some(value) => parse_field::<WorkOrderPriority>("priority", value)?,
            None => WorkOrderPriority::Medium,
        };
        // ベンダー指定時は割り当て済みとして開始
        let status = match request.vendor_id {
            Some(vendor_id) => {
                self.ensure_vendor_in_org(ctx, vendor_id).await?;
                WorkOrderStatus::Assigned
            }
            None => WorkOrderStatus::Open,
        };

        let now = Utc::now();
        let order = self
            .work_order_repo
            .create(work_order_model::ActiveModel {
                id: Set(Uuid::new_v4()),
                org_id: Set(ctx.org_id),
                title: Set(request.title.trim().to_string()),
                description: Set(request.description),
                category: Set(request.category),
                priority: Set(priority.as_str().to_string()),
                status: Set(status.as_str().to_string()),
                vendor_id: Set(request.vendor_id),
                property_ref: Set(request.property_ref),
                created_by: Set(ctx.user_id),
                created_at: Set(now),
                updated_at: Set(now),
            })
            .await?;

        info!(
            work_order_id = %order.id,
            org_id = %order.org_id,
            priority = %order.priority,
            "Work order created"
        );
        self.audit_service
            .record(
                AuditEntry::new(actor, AuditAction::Create, "work_order")
                    .entity_id(order.id)
                    .org_id(Some(order.org_id))
                    .details(json!({
                        "title": order.title,
                        "priority": order.priority,
                        "status": order.status,
                    })),
            )
            .await;

        Ok(order.into())
    }

    /// 状態遷移表に従ってステータスを更新する
    pub async fn update_status(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        request: UpdateWorkOrderStatusRequest,
        actor: AuditActor,
    ) -> AppResult<WorkOrderResponse> {
        let next = parse_field::<WorkOrderStatus>("status", &request.status)?;
        let current = self.find(ctx, id).await?;
        let previous = parse_field::<WorkOrderStatus>("status", &current.status)?;

        if !previous.can_transition_to(next) {
            return Err(conflict_error(
                &format!("Cannot change work order status from {} to {}", previous, next),
                "work_order_service::update_status",
            ));
        }

        if let Some(vendor_id) = request.vendor_id {
            self.ensure_vendor_in_org(ctx, vendor_id).await?;
        }
        let vendor_id = request.vendor_id.or(current.vendor_id);
        if next == WorkOrderStatus::Assigned && vendor_id.is_none() {
            return Err(validation_error(
                "vendor_id",
                "A vendor is required to assign a work order",
            ));
        }

        let mut active: work_order_model::ActiveModel = current.into();
        active.status = Set(next.as_str().to_string());
        active.vendor_id = Set(vendor_id);
        let order = self.work_order_repo.update(active).await?;

        info!(
            work_order_id = %order.id,
            from = %previous,
            to = %next,
            "Work order status changed"
        );
        self.audit_service
            .record(
                AuditEntry::new(actor, AuditAction::StatusChange, "work_order")
                    .entity_id(order.id)
                    .org_id(Some(order.org_id))
                    .details(json!({
                        "from": previous,
                        "to": next,
                        "vendor_id": order.vendor_id,
                        "note": request.note,
                    })),
            )
            .await;

        Ok(order.into())
    }

    async fn ensure_vendor_in_org(&self, ctx: &TenantContext, vendor_id: Uuid) -> AppResult<()> {
        if self.vendor_repo.find_by_id(ctx, vendor_id).await?.is_none() {
            return Err(not_found_error(
                "Vendor",
                &vendor_id.to_string(),
                "work_order_service::ensure_vendor_in_org",
            ));
        }
        Ok(())
    }

    async fn find(&self, ctx: &TenantContext, id: Uuid) -> AppResult<work_order_model::Model> {
        self.work_order_repo
            .find_by_id(ctx, id)
            .await?
            .ok_or_else(|| not_found_error("Work order", &id.to_string(), "work_order_service::find"))
    }
}
