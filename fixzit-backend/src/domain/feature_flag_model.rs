// src/domain/feature_flag_model.rs
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "feature_flags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    pub enabled: bool,
    pub rollout_percentage: i32,
    pub target_org_ids: Json,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if !insert {
            self.updated_at = Set(Utc::now());
        }
        Ok(self)
    }
}

/// `sha256("key:org_id")` の先頭4バイトから0..100のバケットを求める
pub fn rollout_bucket(key: &str, org_id: Uuid) -> u32 {
    let digest = Sha256::digest(format!("{}:{}", key, org_id).as_bytes());
    let head = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    head % 100
}

impl Model {
    pub fn target_orgs(&self) -> Vec<Uuid> {
        serde_json::from_value(self.target_org_ids.clone()).unwrap_or_default()
    }

    /// 組織に対してフラグが有効か評価する
    pub fn is_enabled_for(&self, org_id: Uuid) -> bool {
        if !self.enabled {
            return false;
        }
        if self.target_orgs().contains(&org_id) {
            return true;
        }
        (rollout_bucket(&self.key, org_id) as i32) < self.rollout_percentage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flag(enabled: bool, rollout: i32, targets: Vec<Uuid>) -> Model {
        Model {
            id: Uuid::new_v4(),
            key: "new_dashboard".to_string(),
            name: "New dashboard".to_string(),
            description: None,
            enabled,
            rollout_percentage: rollout,
            target_org_ids: serde_json::json!(targets),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_disabled_flag_is_off_even_for_targets() {
        let org = Uuid::new_v4();
        assert!(!flag(false, 100, vec![org]).is_enabled_for(org));
    }

    #[test]
    fn test_targeted_org_is_on() {
        let org = Uuid::new_v4();
        assert!(flag(true, 0, vec![org]).is_enabled_for(org));
        assert!(!flag(true, 0, vec![]).is_enabled_for(org));
    }

    #[test]
    fn test_full_rollout_and_determinism() {
        let org = Uuid::new_v4();
        assert!(flag(true, 100, vec![]).is_enabled_for(org));
        assert_eq!(rollout_bucket("k", org), rollout_bucket("k", org));
        assert!(rollout_bucket("k", org) < 100);
    }
}
