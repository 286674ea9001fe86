// src/repository/billing_repository.rs
use crate::domain::billing_tier_model::{
    self, ActiveModel as BillingTierActiveModel, Entity as BillingTierEntity,
    Model as BillingTierModel,
};
use crate::domain::coupon_model::{
    self, ActiveModel as CouponActiveModel, Entity as CouponEntity, Model as CouponModel,
};
use crate::domain::subscription_model::{
    self, ActiveModel as SubscriptionActiveModel, Entity as SubscriptionEntity,
    Model as SubscriptionModel, SubscriptionStatus,
};
use sea_orm::{entity::*, query::*, DbConn, DbErr};
use uuid::Uuid;

/// 料金プラン・契約・クーポン
#[derive(Clone)]
pub struct BillingRepository {
    db: DbConn,
}

impl BillingRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    // --- 料金プラン ---

    pub async fn create_tier(
        &self,
        tier: BillingTierActiveModel,
    ) -> Result<BillingTierModel, DbErr> {
        tier.insert(&self.db).await
    }

    pub async fn update_tier(
        &self,
        tier: BillingTierActiveModel,
    ) -> Result<BillingTierModel, DbErr> {
        tier.update(&self.db).await
    }

    pub async fn find_tier_by_id(&self, id: Uuid) -> Result<Option<BillingTierModel>, DbErr> {
        BillingTierEntity::find_by_id(id).one(&self.db).await
    }

    pub async fn find_tier_by_code(&self, code: &str) -> Result<Option<BillingTierModel>, DbErr> {
        BillingTierEntity::find()
            .filter(billing_tier_model::Column::Code.eq(code))
            .one(&self.db)
            .await
    }

    pub async fn list_tiers(&self, include_inactive: bool) -> Result<Vec<BillingTierModel>, DbErr> {
        let mut query = BillingTierEntity::find();
        if !include_inactive {
            query = query.filter(billing_tier_model::Column::IsActive.eq(true));
        }
        query
            .order_by_asc(billing_tier_model::Column::MonthlyPrice)
            .all(&self.db)
            .await
    }

    pub async fn count_tiers(&self) -> Result<u64, DbErr> {
        BillingTierEntity::find().count(&self.db).await
    }

    // --- 契約 ---

    pub async fn find_subscription_by_org(
        &self,
        org_id: Uuid,
    ) -> Result<Option<SubscriptionModel>, DbErr> {
        SubscriptionEntity::find()
            .filter(subscription_model::Column::OrgId.eq(org_id))
            .one(&self.db)
            .await
    }

    pub async fn insert_subscription(
        &self,
        subscription: SubscriptionActiveModel,
    ) -> Result<SubscriptionModel, DbErr> {
        subscription.insert(&self.db).await
    }

    pub async fn update_subscription(
        &self,
        subscription: SubscriptionActiveModel,
    ) -> Result<SubscriptionModel, DbErr> {
        subscription.update(&self.db).await
    }

    pub async fn list_subscriptions(
        &self,
        tier_code: Option<&str>,
        status: Option<&str>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<SubscriptionModel>, u64), DbErr> {
        let mut query = SubscriptionEntity::find();
        if let Some(tier_code) = tier_code {
            query = query.filter(subscription_model::Column::TierCode.eq(tier_code));
        }
        if let Some(status) = status {
            query = query.filter(subscription_model::Column::Status.eq(status));
        }
        let paginator = query
            .order_by_desc(subscription_model::Column::StartedAt)
            .paginate(&self.db, per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    /// 解約済み以外の契約数
    pub async fn count_live_subscriptions(&self, tier_code: &str) -> Result<u64, DbErr> {
        SubscriptionEntity::find()
            .filter(subscription_model::Column::TierCode.eq(tier_code))
            .filter(
                subscription_model::Column::Status
                    .ne(SubscriptionStatus::Cancelled.as_str()),
            )
            .count(&self.db)
            .await
    }

    // --- クーポン ---

    pub async fn create_coupon(&self, coupon: CouponActiveModel) -> Result<CouponModel, DbErr> {
        coupon.insert(&self.db).await
    }

    pub async fn find_coupon_by_code(&self, code: &str) -> Result<Option<CouponModel>, DbErr> {
        CouponEntity::find()
            .filter(coupon_model::Column::Code.eq(code.to_uppercase()))
            .one(&self.db)
            .await
    }

    pub async fn list_coupons(&self) -> Result<Vec<CouponModel>, DbErr> {
        CouponEntity::find()
            .order_by_desc(coupon_model::Column::CreatedAt)
            .all(&self.db)
            .await
    }
}
