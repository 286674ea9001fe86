// src/api/handlers/vendor_handler.rs
use crate::api::dto::vendor_dto::{
    CreateVendorRequest, UpdateVendorRequest, VendorListQuery, VendorResponse,
};
use crate::api::AppState;
use crate::domain::audit_log_model::AuditActor;
use crate::domain::capability::{Action, Module};
use crate::domain::tenant::TenantContext;
use crate::error::AppResult;
use crate::extractors::{ApiQuery, ValidatedJson, ValidatedUuid};
use crate::require_capability;
use crate::types::{ApiResponse, DeletedResponse, PaginatedResponse};
use crate::utils::error_helper::ensure_has_updates;
use axum::{
    extract::State,
    routing::{delete, get, patch, post},
    Router,
};

// 権限チェックはルートレイヤーで実施済み。テナントは抽出器で解決する

pub async fn list_vendors_handler(
    State(app_state): State<AppState>,
    ctx: TenantContext,
    ApiQuery(query): ApiQuery<VendorListQuery>,
) -> AppResult<ApiResponse<PaginatedResponse<VendorResponse>>> {
    let vendors = app_state.vendor_service.list(&ctx, &query).await?;
    Ok(ApiResponse::success(vendors))
}

/// 他テナントのIDは404
pub async fn get_vendor_handler(
    State(app_state): State<AppState>,
    ctx: TenantContext,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<ApiResponse<VendorResponse>> {
    let vendor = app_state.vendor_service.get(&ctx, id).await?;
    Ok(ApiResponse::success(vendor))
}

pub async fn create_vendor_handler(
    State(app_state): State<AppState>,
    ctx: TenantContext,
    actor: AuditActor,
    ValidatedJson(payload): ValidatedJson<CreateVendorRequest>,
) -> AppResult<ApiResponse<VendorResponse>> {
    let vendor = app_state
        .vendor_service
        .create(&ctx, payload, actor)
        .await?;
    Ok(ApiResponse::created(vendor))
}

pub async fn update_vendor_handler(
    State(app_state): State<AppState>,
    ctx: TenantContext,
    ValidatedUuid(id): ValidatedUuid,
    actor: AuditActor,
    ValidatedJson(payload): ValidatedJson<UpdateVendorRequest>,
) -> AppResult<ApiResponse<VendorResponse>> {
    ensure_has_updates(payload.has_updates(), "vendor_handler::update_vendor")?;
    let vendor = app_state
        .vendor_service
        .update(&ctx, id, payload, actor)
        .await?;
    Ok(ApiResponse::success(vendor))
}

pub async fn delete_vendor_handler(
    State(app_state): State<AppState>,
    ctx: TenantContext,
    ValidatedUuid(id): ValidatedUuid,
    actor: AuditActor,
) -> AppResult<ApiResponse<DeletedResponse>> {
    app_state.vendor_service.delete(&ctx, id, actor).await?;
    Ok(ApiResponse::success(DeletedResponse::new(id)))
}

pub fn vendor_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/fm/vendors",
            get(list_vendors_handler)
                .route_layer(require_capability!(Module::Vendor, Action::View)),
        )
        .route(
            "/api/fm/vendors",
            post(create_vendor_handler)
                .route_layer(require_capability!(Module::Vendor, Action::Create)),
        )
        .route(
            "/api/fm/vendors/{id}",
            get(get_vendor_handler)
                .route_layer(require_capability!(Module::Vendor, Action::View)),
        )
        .route(
            "/api/fm/vendors/{id}",
            patch(update_vendor_handler)
                .route_layer(require_capability!(Module::Vendor, Action::Update)),
        )
        .route(
            "/api/fm/vendors/{id}",
            delete(delete_vendor_handler)
                .route_layer(require_capability!(Module::Vendor, Action::Delete)),
        )
}
