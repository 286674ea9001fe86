// src/service/billing_service.rs
use crate::api::dto::billing_dto::{
    CouponResponse, CreateCouponRequest, CreateTierRequest, QuoteRequest, QuoteResponse,
    SubscriptionListQuery, SubscriptionResponse, TierListQuery, TierResponse, UpdateTierRequest,
    UpsertSubscriptionRequest,
};
use crate::domain::audit_log_model::{AuditAction, AuditActor, AuditEntry};
use crate::domain::billing_tier_model;
use crate::domain::coupon_model::{self, DiscountType};
use crate::domain::subscription_model::{self, SubscriptionStatus};
use crate::error::{AppError, AppResult};
use crate::repository::billing_repository::BillingRepository;
use crate::repository::organization_repository::OrganizationRepository;
use crate::service::audit_log_service::AuditLogService;
use crate::types::PaginatedResponse;
use crate::utils::error_helper::{conflict_error, not_found_error, parse_field, validation_error};
use chrono::Utc;
use sea_orm::Set;
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// 料金プラン・契約・クーポン・見積もり
pub struct BillingService {
    billing_repo: Arc<BillingRepository>,
    org_repo: Arc<OrganizationRepository>,
    audit_service: Arc<AuditLogService>,
}

impl BillingService {
    pub fn new(
        billing_repo: Arc<BillingRepository>,
        org_repo: Arc<OrganizationRepository>,
        audit_service: Arc<AuditLogService>,
    ) -> Self {
        Self {
            billing_repo,
            org_repo,
            audit_service,
        }
    }

    // --- 料金プラン ---

    pub async fn list_tiers(&self, query: &TierListQuery) -> AppResult<Vec<TierResponse>> {
        let tiers = self
            .billing_repo
            .list_tiers(query.include_inactive.unwrap_or(false))
            .await?;
        Ok(tiers.into_iter().map(TierResponse::from).collect())
    }

    pub async fn create_tier(
        &self,
        request: CreateTierRequest,
        actor: AuditActor,
    ) -> AppResult<TierResponse> {
        if self.billing_repo.find_tier_by_code(&request.code).await?.is_some() {
            return Err(conflict_error(
                &format!("Billing tier '{}' already exists", request.code),
                "billing_service::create_tier",
            ));
        }

        let now = Utc::now();
        let tier = self
            .billing_repo
            .create_tier(billing_tier_model::ActiveModel {
                id: Set(Uuid::new_v4()),
                code: Set(request.code),
                name: Set(request.name.trim().to_string()),
                monthly_price: Set(request.monthly_price),
                annual_discount_percent: Set(request.annual_discount_percent.unwrap_or(0.0)),
                max_users: Set(request.max_users),
                features: Set(json!(request.features.unwrap_or_default())),
                is_active: Set(request.is_active.unwrap_or(true)),
                created_at: Set(now),
                updated_at: Set(now),
            })
            .await?;

        info!(tier_code = %tier.code, monthly_price = tier.monthly_price, "Billing tier created");
        self.audit_service
            .record(
                AuditEntry::new(actor, AuditAction::Create, "billing_tier")
                    .entity_id(tier.id)
                    .details(json!({
                        "code": tier.code,
                        "monthly_price": tier.monthly_price,
                        "max_users": tier.max_users,
                    })),
            )
            .await;

        Ok(tier.into())
    }

    pub async fn update_tier(
        &self,
        id: Uuid,
        request: UpdateTierRequest,
        actor: AuditActor,
    ) -> AppResult<TierResponse> {
        let current = self.find_tier(id).await?;
        let mut active: billing_tier_model::ActiveModel = current.into();

        if let Some(name) = request.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(price) = request.monthly_price {
            active.monthly_price = Set(price);
        }
        if let Some(discount) = request.annual_discount_percent {
            active.annual_discount_percent = Set(discount);
        }
        if let Some(max_users) = request.max_users {
            active.max_users = Set(max_users);
        }
        if let Some(features) = request.features {
            active.features = Set(json!(features));
        }
        if let Some(is_active) = request.is_active {
            active.is_active = Set(is_active);
        }

        let tier = self.billing_repo.update_tier(active).await?;
        self.audit_service
            .record(
                AuditEntry::new(actor, AuditAction::Update, "billing_tier")
                    .entity_id(tier.id)
                    .details(json!({
                        "code": tier.code,
                        "monthly_price": tier.monthly_price,
                        "is_active": tier.is_active,
                    })),
            )
            .await;

        Ok(tier.into())
    }

    /// 物理削除はせず無効化する。契約中のプランは無効化できない
    pub async fn deactivate_tier(&self, id: Uuid, actor: AuditActor) -> AppResult<TierResponse> {
        let current = self.find_tier(id).await?;

        let live = self
            .billing_repo
            .count_live_subscriptions(&current.code)
            .await?;
        if live > 0 {
            return Err(conflict_error(
                &format!("Billing tier '{}' has {} active subscription(s)", current.code, live),
                "billing_service::deactivate_tier",
            ));
        }

        let mut active: billing_tier_model::ActiveModel = current.into();
        active.is_active = Set(false);
        let tier = self.billing_repo.update_tier(active).await?;

        info!(tier_code = %tier.code, "Billing tier deactivated");
        self.audit_service
            .record(
                AuditEntry::new(actor, AuditAction::Delete, "billing_tier")
                    .entity_id(tier.id)
                    .details(json!({ "code": tier.code })),
            )
            .await;

        Ok(tier.into())
    }

    // --- 契約 ---

    pub async fn list_subscriptions(
        &self,
        query: &SubscriptionListQuery,
    ) -> AppResult<PaginatedResponse<SubscriptionResponse>> {
        let status = match &query.status {
            Some(value) => Some(parse_field::<SubscriptionStatus>("status", value)?),
            None => None,
        };
        let (page, per_page) = query.pagination().get_pagination();

        let (items, total) = self
            .billing_repo
            .list_subscriptions(
                query.tier_code.as_deref(),
                status.as_ref().map(|s| s.as_str()),
                page,
                per_page,
            )
            .await?;
        let items = items.into_iter().map(SubscriptionResponse::from).collect();
        Ok(PaginatedResponse::new(items, page, per_page, total))
    }

    /// 組織の契約を作成または更新する。作成時は true を返す
    pub async fn upsert_subscription(
        &self,
        org_id: Uuid,
        request: UpsertSubscriptionRequest,
        actor: AuditActor,
    ) -> AppResult<(SubscriptionResponse, bool)> {
        if self.org_repo.find_by_id(org_id).await?.is_none() {
            return Err(not_found_error(
                "Organization",
                &org_id.to_string(),
                "billing_service::upsert_subscription",
            ));
        }

        let tier = self
            .billing_repo
            .find_tier_by_code(&request.tier_code)
            .await?
            .ok_or_else(|| {
                not_found_error(
                    "Billing tier",
                    &request.tier_code,
                    "billing_service::upsert_subscription",
                )
            })?;
        if !tier.is_active {
            return Err(AppError::BadRequest(format!(
                "Billing tier '{}' is not active",
                tier.code
            )));
        }
        if request.seats > tier.max_users {
            return Err(validation_error(
                "seats",
                &format!("Tier '{}' allows at most {} seats", tier.code, tier.max_users),
            ));
        }

        let status = match &request.status {
            Some(value) => parse_field::<SubscriptionStatus>("status", value)?,
            None => SubscriptionStatus::Active,
        };

        let now = Utc::now();
        let existing = self.billing_repo.find_subscription_by_org(org_id).await?;
        let created = existing.is_none();
        let previous_tier = existing.as_ref().map(|s| s.tier_code.clone());

        let subscription = match existing {
            Some(current) => {
                let mut active: subscription_model::ActiveModel = current.into();
                active.tier_code = Set(tier.code.clone());
                active.status = Set(status.as_str().to_string());
                active.seats = Set(request.seats);
                if request.renews_at.is_some() {
                    active.renews_at = Set(request.renews_at);
                }
                self.billing_repo.update_subscription(active).await?
            }
            None => {
                self.billing_repo
                    .insert_subscription(subscription_model::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        org_id: Set(org_id),
                        tier_code: Set(tier.code.clone()),
                        status: Set(status.as_str().to_string()),
                        seats: Set(request.seats),
                        started_at: Set(now),
                        renews_at: Set(request.renews_at),
                        updated_at: Set(now),
                    })
                    .await?
            }
        };

        info!(
            org_id = %org_id,
            tier_code = %subscription.tier_code,
            status = %subscription.status,
            "Subscription saved"
        );
        let action = if created {
            AuditAction::Create
        } else {
            AuditAction::Update
        };
        self.audit_service
            .record(
                AuditEntry::new(actor, action, "subscription")
                    .entity_id(subscription.id)
                    .org_id(Some(org_id))
                    .details(json!({
                        "previous_tier": previous_tier,
                        "tier_code": subscription.tier_code,
                        "status": subscription.status,
                        "seats": subscription.seats,
                    })),
            )
            .await;

        Ok((subscription.into(), created))
    }

    // --- クーポン ---

    pub async fn list_coupons(&self) -> AppResult<Vec<CouponResponse>> {
        let coupons = self.billing_repo.list_coupons().await?;
        Ok(coupons.into_iter().map(CouponResponse::from).collect())
    }

    pub async fn create_coupon(
        &self,
        request: CreateCouponRequest,
        actor: AuditActor,
    ) -> AppResult<CouponResponse> {
        let discount_type = parse_field::<DiscountType>("discount_type", &request.discount_type)?;
        discount_type
            .check_value(request.discount_value)
            .map_err(|message| validation_error("discount_value", &message))?;

        let code = request.code.trim().to_uppercase();
        if self.billing_repo.find_coupon_by_code(&code).await?.is_some() {
            return Err(conflict_error(
                &format!("Coupon '{}' already exists", code),
                "billing_service::create_coupon",
            ));
        }

        let coupon = self
            .billing_repo
            .create_coupon(coupon_model::ActiveModel {
                id: Set(Uuid::new_v4()),
                code: Set(code),
                discount_type: Set(discount_type.as_str().to_string()),
                discount_value: Set(request.discount_value),
                max_redemptions: Set(request.max_redemptions),
                redemption_count: Set(0),
                expires_at: Set(request.expires_at),
                is_active: Set(true),
                created_at: Set(Utc::now()),
            })
            .await?;

        info!(coupon_code = %coupon.code, "Coupon created");
        self.audit_service
            .record(
                AuditEntry::new(actor, AuditAction::Create, "coupon")
                    .entity_id(coupon.id)
                    .details(json!({
                        "code": coupon.code,
                        "discount_type": coupon.discount_type,
                        "discount_value": coupon.discount_value,
                    })),
            )
            .await;

        Ok(coupon.into())
    }

    // --- 見積もり ---

    pub async fn quote(&self, request: QuoteRequest) -> AppResult<QuoteResponse> {
        let tier = self
            .billing_repo
            .find_tier_by_code(&request.tier_code)
            .await?
            .filter(|tier| tier.is_active)
            .ok_or_else(|| not_found_error("Billing tier", &request.tier_code, "billing_service::quote"))?;

        let coupon = match &request.coupon_code {
            Some(code) => {
                let coupon = self
                    .billing_repo
                    .find_coupon_by_code(code.trim())
                    .await?
                    .ok_or_else(|| not_found_error("Coupon", code, "billing_service::quote"))?;
                if !coupon.is_redeemable(Utc::now()) {
                    return Err(AppError::BadRequest(format!(
                        "Coupon '{}' is expired or no longer redeemable",
                        coupon.code
                    )));
                }
                Some(coupon)
            }
            None => None,
        };

        Ok(compute_quote(&tier, request.seats, request.annual, coupon.as_ref()))
    }

    async fn find_tier(&self, id: Uuid) -> AppResult<billing_tier_model::Model> {
        self.billing_repo.find_tier_by_id(id).await?.ok_or_else(|| {
            not_found_error("Billing tier", &id.to_string(), "billing_service::find_tier")
        })
    }
}

/// 見積もり計算（金額は最小通貨単位で丸める）
///
/// 年額払いは12ヶ月分から年間割引を引き、クーポンは割引後の金額に適用する。
pub fn compute_quote(
    tier: &billing_tier_model::Model,
    seats: i32,
    annual: bool,
    coupon: Option<&coupon_model::Model>,
) -> QuoteResponse {
    let months: i64 = if annual { 12 } else { 1 };
    let subtotal = tier
        .monthly_price
        .saturating_mul(i64::from(seats))
        .saturating_mul(months);

    let annual_discount = if annual {
        percent_of(subtotal, tier.annual_discount_percent)
    } else {
        0
    };
    let after_annual = subtotal - annual_discount;

    let coupon_discount = coupon
        .and_then(|c| c.discount_kind().map(|kind| (kind, c.discount_value)))
        .map_or(0, |(kind, value)| match kind {
            DiscountType::Percentage => percent_of(after_annual, value),
            DiscountType::FixedAmount => (value.round() as i64).clamp(0, after_annual),
        });

    QuoteResponse {
        tier_code: tier.code.clone(),
        seats,
        billing_period: if annual { "annual" } else { "monthly" }.to_string(),
        months,
        unit_price: tier.monthly_price,
        subtotal,
        annual_discount,
        coupon_code: coupon.map(|c| c.code.clone()),
        coupon_discount,
        total: after_annual - coupon_discount,
    }
}

fn percent_of(amount: i64, percent: f64) -> i64 {
    let percent = percent.clamp(0.0, 100.0);
    ((amount as f64) * percent / 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(monthly_price: i64, annual_discount_percent: f64) -> billing_tier_model::Model {
        billing_tier_model::Model {
            id: Uuid::new_v4(),
            code: "professional".to_string(),
            name: "Professional".to_string(),
            monthly_price,
            annual_discount_percent,
            max_users: 50,
            features: json!([]),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn coupon(kind: DiscountType, value: f64) -> coupon_model::Model {
        coupon_model::Model {
            id: Uuid::new_v4(),
            code: "LAUNCH".to_string(),
            discount_type: kind.as_str().to_string(),
            discount_value: value,
            max_redemptions: None,
            redemption_count: 0,
            expires_at: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_monthly_quote_without_coupon() {
        let quote = compute_quote(&tier(5_000, 20.0), 3, false, None);
        assert_eq!(quote.months, 1);
        assert_eq!(quote.subtotal, 15_000);
        assert_eq!(quote.annual_discount, 0);
        assert_eq!(quote.total, 15_000);
        assert_eq!(quote.billing_period, "monthly");
    }

    #[test]
    fn test_annual_quote_applies_discount_then_percentage_coupon() {
        let c = coupon(DiscountType::Percentage, 10.0);
        let quote = compute_quote(&tier(1_000, 20.0), 2, true, Some(&c));
        // 1000 * 2 * 12 = 24000, 年間割引 4800, 残り 19200 の10% = 1920
        assert_eq!(quote.subtotal, 24_000);
        assert_eq!(quote.annual_discount, 4_800);
        assert_eq!(quote.coupon_discount, 1_920);
        assert_eq!(quote.total, 17_280);
        assert_eq!(quote.coupon_code.as_deref(), Some("LAUNCH"));
    }

    #[test]
    fn test_fixed_coupon_never_goes_negative() {
        let c = coupon(DiscountType::FixedAmount, 50_000.0);
        let quote = compute_quote(&tier(1_000, 0.0), 1, false, Some(&c));
        assert_eq!(quote.coupon_discount, 1_000);
        assert_eq!(quote.total, 0);
    }
}
