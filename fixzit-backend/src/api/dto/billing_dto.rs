// src/api/dto/billing_dto.rs
use crate::domain::billing_tier_model::Model as BillingTierModel;
use crate::domain::coupon_model::Model as CouponModel;
use crate::domain::subscription_model::Model as SubscriptionModel;
use crate::types::PaginationQuery;
use crate::utils::validation::validate_slug;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// --- 料金プラン ---

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTierRequest {
    #[validate(custom(function = validate_slug))]
    pub code: String,

    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    /// 最小通貨単位
    #[validate(range(min = 0, message = "monthly_price must not be negative"))]
    pub monthly_price: i64,

    #[validate(range(min = 0.0, max = 100.0, message = "annual_discount_percent must be between 0 and 100"))]
    pub annual_discount_percent: Option<f64>,

    #[validate(range(min = 1, message = "max_users must be at least 1"))]
    pub max_users: i32,

    pub features: Option<Vec<String>>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTierRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,

    #[validate(range(min = 0, message = "monthly_price must not be negative"))]
    pub monthly_price: Option<i64>,

    #[validate(range(min = 0.0, max = 100.0, message = "annual_discount_percent must be between 0 and 100"))]
    pub annual_discount_percent: Option<f64>,

    #[validate(range(min = 1, message = "max_users must be at least 1"))]
    pub max_users: Option<i32>,

    pub features: Option<Vec<String>>,

    pub is_active: Option<bool>,
}

impl UpdateTierRequest {
    pub fn has_updates(&self) -> bool {
        self.name.is_some()
            || self.monthly_price.is_some()
            || self.annual_discount_percent.is_some()
            || self.max_users.is_some()
            || self.features.is_some()
            || self.is_active.is_some()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TierListQuery {
    pub include_inactive: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierResponse {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub monthly_price: i64,
    pub annual_discount_percent: f64,
    pub max_users: i32,
    pub features: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BillingTierModel> for TierResponse {
    fn from(tier: BillingTierModel) -> Self {
        Self {
            features: serde_json::from_value(tier.features.clone()).unwrap_or_default(),
            id: tier.id,
            code: tier.code,
            name: tier.name,
            monthly_price: tier.monthly_price,
            annual_discount_percent: tier.annual_discount_percent,
            max_users: tier.max_users,
            is_active: tier.is_active,
            created_at: tier.created_at,
            updated_at: tier.updated_at,
        }
    }
}

// --- 契約 ---

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertSubscriptionRequest {
    #[validate(length(min = 1, max = 64, message = "tier_code is required"))]
    pub tier_code: String,

    pub status: Option<String>,

    #[validate(range(min = 1, max = 100000, message = "seats must be between 1 and 100000"))]
    pub seats: i32,

    pub renews_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscriptionListQuery {
    pub tier_code: Option<String>,
    pub status: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl SubscriptionListQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    pub id: Uuid,
    pub org_id: Uuid,
    pub tier_code: String,
    pub status: String,
    pub seats: i32,
    pub started_at: DateTime<Utc>,
    pub renews_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl From<SubscriptionModel> for SubscriptionResponse {
    fn from(sub: SubscriptionModel) -> Self {
        Self {
            id: sub.id,
            org_id: sub.org_id,
            tier_code: sub.tier_code,
            status: sub.status,
            seats: sub.seats,
            started_at: sub.started_at,
            renews_at: sub.renews_at,
            updated_at: sub.updated_at,
        }
    }
}

// --- クーポン ---

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCouponRequest {
    #[validate(length(min = 3, max = 32, message = "Coupon code must be between 3 and 32 characters"))]
    pub code: String,

    pub discount_type: String,

    /// 範囲は割引種別に応じてサービス層で検証
    pub discount_value: f64,

    #[validate(range(min = 1, message = "max_redemptions must be at least 1"))]
    pub max_redemptions: Option<i32>,

    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponResponse {
    pub id: Uuid,
    pub code: String,
    pub discount_type: String,
    pub discount_value: f64,
    pub max_redemptions: Option<i32>,
    pub redemption_count: i32,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<CouponModel> for CouponResponse {
    fn from(coupon: CouponModel) -> Self {
        Self {
            id: coupon.id,
            code: coupon.code,
            discount_type: coupon.discount_type,
            discount_value: coupon.discount_value,
            max_redemptions: coupon.max_redemptions,
            redemption_count: coupon.redemption_count,
            expires_at: coupon.expires_at,
            is_active: coupon.is_active,
            created_at: coupon.created_at,
        }
    }
}

// --- 見積もり ---

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuoteRequest {
    #[validate(length(min = 1, max = 64, message = "tier_code is required"))]
    pub tier_code: String,

    #[validate(range(min = 1, max = 100000, message = "seats must be between 1 and 100000"))]
    pub seats: i32,

    #[serde(default)]
    pub annual: bool,

    #[validate(length(min = 3, max = 32, message = "Coupon code must be between 3 and 32 characters"))]
    pub coupon_code: Option<String>,
}

/// 金額はすべて最小通貨単位
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub tier_code: String,
    pub seats: i32,
    pub billing_period: String,
    pub months: i64,
    pub unit_price: i64,
    pub subtotal: i64,
    pub annual_discount: i64,
    pub coupon_code: Option<String>,
    pub coupon_discount: i64,
    pub total: i64,
}
