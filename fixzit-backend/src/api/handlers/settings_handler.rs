// src/api/handlers/settings_handler.rs
use crate::api::dto::branding_dto::{
    BrandingResponse, PublicBrandingResponse, UpdateBrandingRequest,
};
use crate::api::dto::settings_dto::{SettingListQuery, SettingResponse, UpsertSettingRequest};
use crate::api::AppState;
use crate::domain::audit_log_model::AuditActor;
use crate::error::AppResult;
use crate::extractors::{ApiQuery, ValidatedJson};
use crate::types::{ApiResponse, DeletedResponse};
use crate::utils::error_helper::ensure_has_updates;
use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};

// --- プラットフォーム設定 ---

pub async fn list_settings_handler(
    State(app_state): State<AppState>,
    ApiQuery(query): ApiQuery<SettingListQuery>,
) -> AppResult<ApiResponse<Vec<SettingResponse>>> {
    let settings = app_state.settings_service.list(&query).await?;
    Ok(ApiResponse::success(settings))
}

pub async fn get_setting_handler(
    State(app_state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<ApiResponse<SettingResponse>> {
    let setting = app_state.settings_service.get(&key).await?;
    Ok(ApiResponse::success(setting))
}

/// 設定の作成・更新。新規作成時は201
pub async fn put_setting_handler(
    State(app_state): State<AppState>,
    Path(key): Path<String>,
    actor: AuditActor,
    ValidatedJson(payload): ValidatedJson<UpsertSettingRequest>,
) -> AppResult<ApiResponse<SettingResponse>> {
    let (setting, created) = app_state
        .settings_service
        .upsert(&key, payload, actor)
        .await?;
    Ok(if created {
        ApiResponse::created(setting)
    } else {
        ApiResponse::success(setting)
    })
}

pub async fn delete_setting_handler(
    State(app_state): State<AppState>,
    Path(key): Path<String>,
    actor: AuditActor,
) -> AppResult<ApiResponse<DeletedResponse>> {
    app_state.settings_service.delete(&key, actor).await?;
    Ok(ApiResponse::success(DeletedResponse::new(key)))
}

// --- ブランディング ---

pub async fn get_branding_handler(
    State(app_state): State<AppState>,
) -> AppResult<ApiResponse<BrandingResponse>> {
    let branding = app_state.settings_service.branding().await?;
    Ok(ApiResponse::success(branding.into()))
}

pub async fn update_branding_handler(
    State(app_state): State<AppState>,
    actor: AuditActor,
    ValidatedJson(payload): ValidatedJson<UpdateBrandingRequest>,
) -> AppResult<ApiResponse<BrandingResponse>> {
    ensure_has_updates(payload.has_updates(), "settings_handler::update_branding")?;
    let branding = app_state
        .settings_service
        .update_branding(payload, actor)
        .await?;
    Ok(ApiResponse::success(branding.into()))
}

/// ログイン画面向けの公開ブランディング
pub async fn public_branding_handler(
    State(app_state): State<AppState>,
) -> AppResult<ApiResponse<PublicBrandingResponse>> {
    let branding = app_state.settings_service.branding().await?;
    Ok(ApiResponse::success(branding.into()))
}

pub fn settings_routes() -> Router<AppState> {
    Router::new()
        .route("/api/superadmin/settings", get(list_settings_handler))
        .route(
            "/api/superadmin/settings/{key}",
            get(get_setting_handler)
                .put(put_setting_handler)
                .delete(delete_setting_handler),
        )
        .route(
            "/api/superadmin/branding",
            get(get_branding_handler).patch(update_branding_handler),
        )
}

pub fn public_branding_routes() -> Router<AppState> {
    Router::new().route("/api/branding", get(public_branding_handler))
}
