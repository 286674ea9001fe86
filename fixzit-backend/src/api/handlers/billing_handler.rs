// src/api/handlers/billing_handler.rs
use crate::api::dto::billing_dto::{
    CouponResponse, CreateCouponRequest, CreateTierRequest, QuoteRequest, QuoteResponse,
    SubscriptionListQuery, SubscriptionResponse, TierListQuery, TierResponse, UpdateTierRequest,
    UpsertSubscriptionRequest,
};
use crate::api::AppState;
use crate::domain::audit_log_model::AuditActor;
use crate::error::AppResult;
use crate::extractors::{ApiQuery, ValidatedJson, ValidatedUuid};
use crate::types::{ApiResponse, PaginatedResponse};
use crate::utils::error_helper::ensure_has_updates;
use axum::{
    extract::State,
    routing::{get, patch, post, put},
    Router,
};

// --- 料金プラン ---

pub async fn list_tiers_handler(
    State(app_state): State<AppState>,
    ApiQuery(query): ApiQuery<TierListQuery>,
) -> AppResult<ApiResponse<Vec<TierResponse>>> {
    let tiers = app_state.billing_service.list_tiers(&query).await?;
    Ok(ApiResponse::success(tiers))
}

pub async fn create_tier_handler(
    State(app_state): State<AppState>,
    actor: AuditActor,
    ValidatedJson(payload): ValidatedJson<CreateTierRequest>,
) -> AppResult<ApiResponse<TierResponse>> {
    let tier = app_state.billing_service.create_tier(payload, actor).await?;
    Ok(ApiResponse::created(tier))
}

pub async fn update_tier_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
    actor: AuditActor,
    ValidatedJson(payload): ValidatedJson<UpdateTierRequest>,
) -> AppResult<ApiResponse<TierResponse>> {
    ensure_has_updates(payload.has_updates(), "billing_handler::update_tier")?;
    let tier = app_state
        .billing_service
        .update_tier(id, payload, actor)
        .await?;
    Ok(ApiResponse::success(tier))
}

/// 削除は無効化として扱う。契約中のプランは409
pub async fn deactivate_tier_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
    actor: AuditActor,
) -> AppResult<ApiResponse<TierResponse>> {
    let tier = app_state.billing_service.deactivate_tier(id, actor).await?;
    Ok(ApiResponse::success(tier))
}

// --- 契約 ---

pub async fn list_subscriptions_handler(
    State(app_state): State<AppState>,
    ApiQuery(query): ApiQuery<SubscriptionListQuery>,
) -> AppResult<ApiResponse<PaginatedResponse<SubscriptionResponse>>> {
    let subscriptions = app_state.billing_service.list_subscriptions(&query).await?;
    Ok(ApiResponse::success(subscriptions))
}

pub async fn upsert_subscription_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(org_id): ValidatedUuid,
    actor: AuditActor,
    ValidatedJson(payload): ValidatedJson<UpsertSubscriptionRequest>,
) -> AppResult<ApiResponse<SubscriptionResponse>> {
    let (subscription, created) = app_state
        .billing_service
        .upsert_subscription(org_id, payload, actor)
        .await?;
    Ok(if created {
        ApiResponse::created(subscription)
    } else {
        ApiResponse::success(subscription)
    })
}

// --- クーポン・見積もり ---

pub async fn list_coupons_handler(
    State(app_state): State<AppState>,
) -> AppResult<ApiResponse<Vec<CouponResponse>>> {
    let coupons = app_state.billing_service.list_coupons().await?;
    Ok(ApiResponse::success(coupons))
}

pub async fn create_coupon_handler(
    State(app_state): State<AppState>,
    actor: AuditActor,
    ValidatedJson(payload): ValidatedJson<CreateCouponRequest>,
) -> AppResult<ApiResponse<CouponResponse>> {
    let coupon = app_state
        .billing_service
        .create_coupon(payload, actor)
        .await?;
    Ok(ApiResponse::created(coupon))
}

pub async fn quote_handler(
    State(app_state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<QuoteRequest>,
) -> AppResult<ApiResponse<QuoteResponse>> {
    let quote = app_state.billing_service.quote(payload).await?;
    Ok(ApiResponse::success(quote))
}

pub fn billing_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/superadmin/billing/tiers",
            get(list_tiers_handler).post(create_tier_handler),
        )
        .route(
            "/api/superadmin/billing/tiers/{id}",
            patch(update_tier_handler).delete(deactivate_tier_handler),
        )
        .route(
            "/api/superadmin/billing/subscriptions",
            get(list_subscriptions_handler),
        )
        .route(
            "/api/superadmin/organizations/{id}/subscription",
            put(upsert_subscription_handler),
        )
        .route(
            "/api/superadmin/billing/coupons",
            get(list_coupons_handler).post(create_coupon_handler),
        )
        .route("/api/superadmin/billing/quote", post(quote_handler))
}
