// src/domain/pricing_benchmark_model.rs
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// サービス単価の市場相場
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pricing_benchmarks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub category: String,
    #[sea_orm(unique)]
    pub service_code: String,
    pub service_name: String,
    pub unit_description: String,
    pub min_price: f64,
    pub typical_price: f64,
    pub max_price: f64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

string_enum! {
    pub enum PricePosition {
        BelowRange => "below_range",
        WithinRange => "within_range",
        AboveRange => "above_range",
    }
}

/// min <= typical <= max かつ非負であること
pub fn check_price_range(min: f64, typical: f64, max: f64) -> Result<(), String> {
    if [min, typical, max].iter().any(|p| !p.is_finite() || *p < 0.0) {
        return Err("prices must be non-negative numbers".to_string());
    }
    if !(min <= typical && typical <= max) {
        return Err("prices must satisfy min_price <= typical_price <= max_price".to_string());
    }
    Ok(())
}

impl Model {
    pub fn position_of(&self, price: f64) -> PricePosition {
        if price < self.min_price {
            PricePosition::BelowRange
        } else if price > self.max_price {
            PricePosition::AboveRange
        } else {
            PricePosition::WithinRange
        }
    }

    /// 標準価格からの乖離率（%）
    pub fn deviation_percent(&self, price: f64) -> Option<f64> {
        if self.typical_price == 0.0 {
            return None;
        }
        let raw = (price - self.typical_price) / self.typical_price * 100.0;
        Some((raw * 100.0).round() / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn benchmark() -> Model {
        Model {
            id: Uuid::new_v4(),
            category: "hvac".to_string(),
            service_code: "ac_service".to_string(),
            service_name: "AC Service".to_string(),
            unit_description: "per unit".to_string(),
            min_price: 100.0,
            typical_price: 150.0,
            max_price: 250.0,
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_range_validation() {
        assert!(check_price_range(1.0, 2.0, 3.0).is_ok());
        assert!(check_price_range(2.0, 2.0, 2.0).is_ok());
        assert!(check_price_range(3.0, 2.0, 4.0).is_err());
        assert!(check_price_range(-1.0, 2.0, 4.0).is_err());
    }

    #[test]
    fn test_position_and_deviation() {
        let b = benchmark();
        assert_eq!(b.position_of(90.0), PricePosition::BelowRange);
        assert_eq!(b.position_of(150.0), PricePosition::WithinRange);
        assert_eq!(b.position_of(300.0), PricePosition::AboveRange);
        assert_eq!(b.deviation_percent(180.0), Some(20.0));
        assert_eq!(b.deviation_percent(100.0), Some(-33.33));
    }
}
