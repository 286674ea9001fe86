// src/domain/coupon_model.rs
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "coupons")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub discount_type: String,
    pub discount_value: f64,
    pub max_redemptions: Option<i32>,
    pub redemption_count: i32,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

string_enum! {
    pub enum DiscountType {
        Percentage => "percentage",
        FixedAmount => "fixed_amount",
    }
}

impl DiscountType {
    /// 割引値の範囲チェック（percentageは0〜100、fixed_amountは正の値）
    pub fn check_value(&self, value: f64) -> Result<(), String> {
        if !value.is_finite() {
            return Err("discount_value must be a finite number".to_string());
        }
        match self {
            DiscountType::Percentage if !(0.0..=100.0).contains(&value) => {
                Err("percentage discount must be between 0 and 100".to_string())
            }
            DiscountType::FixedAmount if value <= 0.0 => {
                Err("fixed_amount discount must be greater than 0".to_string())
            }
            _ => Ok(()),
        }
    }
}

impl Model {
    /// 期限・回数・有効フラグを考慮して利用可能か
    pub fn is_redeemable(&self, now: DateTime<Utc>) -> bool {
        self.is_active
            && self.expires_at.map_or(true, |exp| exp > now)
            && self
                .max_redemptions
                .map_or(true, |max| self.redemption_count < max)
    }

    pub fn discount_kind(&self) -> Option<DiscountType> {
        self.discount_type.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_percentage_bounds() {
        assert!(DiscountType::Percentage.check_value(0.0).is_ok());
        assert!(DiscountType::Percentage.check_value(100.0).is_ok());
        assert!(DiscountType::Percentage.check_value(100.5).is_err());
        assert!(DiscountType::Percentage.check_value(-1.0).is_err());
        assert!(DiscountType::Percentage.check_value(f64::NAN).is_err());
    }

    #[test]
    fn test_fixed_amount_must_be_positive() {
        assert!(DiscountType::FixedAmount.check_value(500.0).is_ok());
        assert!(DiscountType::FixedAmount.check_value(0.0).is_err());
    }

    #[test]
    fn test_redeemable() {
        let now = Utc::now();
        let mut coupon = Model {
            id: Uuid::new_v4(),
            code: "WELCOME".to_string(),
            discount_type: "percentage".to_string(),
            discount_value: 10.0,
            max_redemptions: Some(1),
            redemption_count: 0,
            expires_at: Some(now + Duration::days(1)),
            is_active: true,
            created_at: now,
        };
        assert!(coupon.is_redeemable(now));
        coupon.redemption_count = 1;
        assert!(!coupon.is_redeemable(now));
        coupon.redemption_count = 0;
        coupon.expires_at = Some(now - Duration::days(1));
        assert!(!coupon.is_redeemable(now));
    }
}
