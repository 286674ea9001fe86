// src/api/handlers/organization_handler.rs
use crate::api::dto::organization_dto::{
    CreateOrganizationRequest, OrganizationListQuery, OrganizationResponse,
    UpdateOrganizationRequest,
};
use crate::api::AppState;
use crate::domain::audit_log_model::AuditActor;
use crate::error::AppResult;
use crate::extractors::{ApiQuery, ValidatedJson, ValidatedUuid};
use crate::types::{ApiResponse, PaginatedResponse};
use crate::utils::error_helper::ensure_has_updates;
use axum::{
    extract::State,
    routing::get,
    Router,
};
use tracing::info;

/// 組織一覧
pub async fn list_organizations_handler(
    State(app_state): State<AppState>,
    ApiQuery(query): ApiQuery<OrganizationListQuery>,
) -> AppResult<ApiResponse<PaginatedResponse<OrganizationResponse>>> {
    let organizations = app_state.organization_service.list(&query).await?;
    Ok(ApiResponse::success(organizations))
}

pub async fn get_organization_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<ApiResponse<OrganizationResponse>> {
    let organization = app_state.organization_service.get(id).await?;
    Ok(ApiResponse::success(organization))
}

/// 組織作成
pub async fn create_organization_handler(
    State(app_state): State<AppState>,
    actor: AuditActor,
    ValidatedJson(payload): ValidatedJson<CreateOrganizationRequest>,
) -> AppResult<ApiResponse<OrganizationResponse>> {
    info!(code = %payload.code, "Creating organization");
    let organization = app_state
        .organization_service
        .create(payload, actor)
        .await?;
    Ok(ApiResponse::created(organization))
}

pub async fn update_organization_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
    actor: AuditActor,
    ValidatedJson(payload): ValidatedJson<UpdateOrganizationRequest>,
) -> AppResult<ApiResponse<OrganizationResponse>> {
    ensure_has_updates(payload.has_updates(), "organization_handler::update_organization")?;
    let organization = app_state
        .organization_service
        .update(id, payload, actor)
        .await?;
    Ok(ApiResponse::success(organization))
}

pub fn organization_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/superadmin/organizations",
            get(list_organizations_handler).post(create_organization_handler),
        )
        .route(
            "/api/superadmin/organizations/{id}",
            get(get_organization_handler).patch(update_organization_handler),
        )
}
