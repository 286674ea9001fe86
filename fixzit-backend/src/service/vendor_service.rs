// src/service/vendor_service.rs
use crate::api::dto::vendor_dto::{
    CreateVendorRequest, UpdateVendorRequest, VendorListQuery, VendorResponse,
};
use crate::domain::audit_log_model::{AuditAction, AuditActor, AuditEntry};
use crate::domain::tenant::TenantContext;
use crate::domain::vendor_model;
use crate::error::AppResult;
use crate::repository::vendor_repository::VendorRepository;
use crate::service::audit_log_service::AuditLogService;
use crate::types::PaginatedResponse;
use crate::utils::error_helper::not_found_error;
use crate::utils::search::sanitize_search;
use chrono::Utc;
use sea_orm::Set;
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// テナントのベンダー管理。すべての操作は `TenantContext` の組織に限定される
pub struct VendorService {
    vendor_repo: Arc<VendorRepository>,
    audit_service: Arc<AuditLogService>,
}

impl VendorService {
    pub fn new(vendor_repo: Arc<VendorRepository>, audit_service: Arc<AuditLogService>) -> Self {
        Self {
            vendor_repo,
            audit_service,
        }
    }

    pub async fn list(
        &self,
        ctx: &TenantContext,
        query: &VendorListQuery,
    ) -> AppResult<PaginatedResponse<VendorResponse>> {
        let search = query.search.as_deref().and_then(sanitize_search);
        let (page, per_page) = query.pagination().get_pagination();

        let (vendors, total) = self
            .vendor_repo
            .list(ctx, search.as_deref(), query.is_active, page, per_page)
            .await?;
        let items = vendors.into_iter().map(VendorResponse::from).collect();
        Ok(PaginatedResponse::new(items, page, per_page, total))
    }

    pub async fn get(&self, ctx: &TenantContext, id: Uuid) -> AppResult<VendorResponse> {
        Ok(self.find(ctx, id).await?.into())
    }

    pub async fn create(
        &self,
        ctx: &TenantContext,
        request: CreateVendorRequest,
        actor: AuditActor,
    ) -> AppResult<VendorResponse> {
        let now = Utc::now();
        let vendor = self
            .vendor_repo
            .create(vendor_model::ActiveModel {
                id: Set(Uuid::new_v4()),
                org_id: Set(ctx.org_id),
                name: Set(request.name.trim().to_string()),
                company: Set(request.company),
                email: Set(request.email.map(|e| e.trim().to_lowercase())),
                phone: Set(request.phone),
                specialization: Set(request.specialization),
                rating: Set(request.rating.unwrap_or(0.0)),
                is_active: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
            })
            .await?;

        info!(vendor_id = %vendor.id, org_id = %vendor.org_id, "Vendor created");
        self.audit_service
            .record(
                AuditEntry::new(actor, AuditAction::Create, "vendor")
                    .entity_id(vendor.id)
                    .org_id(Some(vendor.org_id))
                    .details(json!({ "name": vendor.name })),
            )
            .await;

        Ok(vendor.into())
    }

    pub async fn update(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        request: UpdateVendorRequest,
        actor: AuditActor,
    ) -> AppResult<VendorResponse> {
        let current = self.find(ctx, id).await?;
        let mut active: vendor_model::ActiveModel = current.into();

        if let Some(name) = request.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(company) = request.company {
            active.company = Set(Some(company));
        }
        if let Some(email) = request.email {
            active.email = Set(Some(email.trim().to_lowercase()));
        }
        if let Some(phone) = request.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(specialization) = request.specialization {
            active.specialization = Set(Some(specialization));
        }
        if let Some(rating) = request.rating {
            active.rating = Set(rating);
        }
        if let Some(is_active) = request.is_active {
            active.is_active = Set(is_active);
        }

        let vendor = self.vendor_repo.update(active).await?;
        self.audit_service
            .record(
                AuditEntry::new(actor, AuditAction::Update, "vendor")
                    .entity_id(vendor.id)
                    .org_id(Some(vendor.org_id))
                    .details(json!({ "name": vendor.name, "is_active": vendor.is_active })),
            )
            .await;

        Ok(vendor.into())
    }

    pub async fn delete(&self, ctx: &TenantContext, id: Uuid, actor: AuditActor) -> AppResult<()> {
        let deleted = self.vendor_repo.delete(ctx, id).await?;
        if deleted == 0 {
            return Err(not_found_error("Vendor", &id.to_string(), "vendor_service::delete"));
        }

        info!(vendor_id = %id, org_id = %ctx.org_id, "Vendor deleted");
        self.audit_service
            .record(
                AuditEntry::new(actor, AuditAction::Delete, "vendor")
                    .entity_id(id)
                    .org_id(Some(ctx.org_id)),
            )
            .await;
        Ok(())
    }

    /// 他組織のIDは存在しないものとして扱う
    async fn find(&self, ctx: &TenantContext, id: Uuid) -> AppResult<vendor_model::Model> {
        self.vendor_repo
            .find_by_id(ctx, id)
            .await?
            .ok_or_else(|| not_found_error("Vendor", &id.to_string(), "vendor_service::find"))
    }
}
