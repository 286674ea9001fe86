// src/service/organization_service.rs
use crate::api::dto::organization_dto::{
    CreateOrganizationRequest, OrganizationListQuery, OrganizationResponse,
    UpdateOrganizationRequest,
};
use crate::domain::audit_log_model::{AuditAction, AuditActor, AuditEntry};
use crate::domain::organization_model::{self, OrganizationStatus};
use crate::error::AppResult;
use crate::repository::organization_repository::OrganizationRepository;
use crate::service::audit_log_service::AuditLogService;
use crate::types::PaginatedResponse;
use crate::utils::error_helper::{conflict_error, not_found_error, parse_field};
use crate::utils::search::sanitize_search;
use chrono::Utc;
use sea_orm::Set;
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// 組織の既定ユーザー上限
const DEFAULT_MAX_USERS: i32 = 10;

pub struct OrganizationService {
    org_repo: Arc<OrganizationRepository>,
    audit_service: Arc<AuditLogService>,
}

impl OrganizationService {
    pub fn new(org_repo: Arc<OrganizationRepository>, audit_service: Arc<AuditLogService>) -> Self {
        Self {
            org_repo,
            audit_service,
        }
    }

    pub async fn list(
        &self,
        query: &OrganizationListQuery,
    ) -> AppResult<PaginatedResponse<OrganizationResponse>> {
        let status = match &query.status {
            Some(value) => Some(parse_field::<OrganizationStatus>("status", value)?),
            None => None,
        };
        let search = query.search.as_deref().and_then(sanitize_search);
        let (page, per_page) = query.pagination().get_pagination();

        let (orgs, total) = self
            .org_repo
            .list(
                search.as_deref(),
                status.as_ref().map(|s| s.as_str()),
                page,
                per_page,
            )
            .await?;

        let items = orgs.into_iter().map(OrganizationResponse::from).collect();
        Ok(PaginatedResponse::new(items, page, per_page, total))
    }

    pub async fn get(&self, id: Uuid) -> AppResult<OrganizationResponse> {
        let org = self.find(id).await?;
        Ok(org.into())
    }

    pub async fn create(
        &self,
        request: CreateOrganizationRequest,
        actor: AuditActor,
    ) -> AppResult<OrganizationResponse> {
        let status = match &request.status {
            Some(value) => parse_field::<OrganizationStatus>("status", value)?,
            None => OrganizationStatus::Active,
        };

        if self.org_repo.find_by_code(&request.code).await?.is_some() {
            return Err(conflict_error(
                &format!("Organization code '{}' is already in use", request.code),
                "organization_service::create",
            ));
        }

        let now = Utc::now();
        let org = self
            .org_repo
            .create(organization_model::ActiveModel {
                id: Set(Uuid::new_v4()),
                name: Set(request.name.trim().to_string()),
                code: Set(request.code.clone()),
                status: Set(status.as_str().to_string()),
                contact_email: Set(request.contact_email.map(|e| e.trim().to_lowercase())),
                country: Set(request.country),
                max_users: Set(request.max_users.unwrap_or(DEFAULT_MAX_USERS)),
                created_at: Set(now),
                updated_at: Set(now),
            })
            .await?;

        info!(org_id = %org.id, code = %org.code, "Organization created");
        self.audit_service
            .record(
                AuditEntry::new(actor, AuditAction::Create, "organization")
                    .entity_id(org.id)
                    .org_id(Some(org.id))
                    .details(json!({ "code": org.code, "status": org.status })),
            )
            .await;

        Ok(org.into())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateOrganizationRequest,
        actor: AuditActor,
    ) -> AppResult<OrganizationResponse> {
        let current = self.find(id).await?;
        let previous_status = current.status.clone();
        let mut active: organization_model::ActiveModel = current.into();

        if let Some(name) = request.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(status) = &request.status {
            let status = parse_field::<OrganizationStatus>("status", status)?;
            active.status = Set(status.as_str().to_string());
        }
        if let Some(email) = request.contact_email {
            active.contact_email = Set(Some(email.trim().to_lowercase()));
        }
        if let Some(country) = request.country {
            active.country = Set(Some(country));
        }
        if let Some(max_users) = request.max_users {
            active.max_users = Set(max_users);
        }

        let org = self.org_repo.update(active).await?;

        let action = if org.status != previous_status {
            AuditAction::StatusChange
        } else {
            AuditAction::Update
        };
        self.audit_service
            .record(
                AuditEntry::new(actor, action, "organization")
                    .entity_id(org.id)
                    .org_id(Some(org.id))
                    .details(json!({ "previous_status": previous_status, "status": org.status })),
            )
            .await;

        Ok(org.into())
    }

    async fn find(&self, id: Uuid) -> AppResult<organization_model::Model> {
        self.org_repo.find_by_id(id).await?.ok_or_else(|| {
            not_found_error("Organization", &id.to_string(), "organization_service::find")
        })
    }
}
