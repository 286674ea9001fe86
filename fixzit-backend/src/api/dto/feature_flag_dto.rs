// src/api/dto/feature_flag_dto.rs
use crate::api::dto::deserialize_nullable;
use crate::domain::feature_flag_model::Model as FeatureFlagModel;
use crate::utils::validation::validate_slug;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFeatureFlagRequest {
    #[validate(custom(function = validate_slug))]
    pub key: String,

    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(length(max = 500, message = "Description must be 500 characters or less"))]
    pub description: Option<String>,

    pub enabled: Option<bool>,

    #[validate(range(min = 0, max = 100, message = "rollout_percentage must be between 0 and 100"))]
    pub rollout_percentage: Option<i32>,

    #[validate(length(max = 1000, message = "target_org_ids must contain at most 1000 ids"))]
    pub target_org_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateFeatureFlagRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,

    /// `null` で説明を消去
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[validate(length(max = 500, message = "Description must be 500 characters or less"))]
    pub description: Option<Option<String>>,

    pub enabled: Option<bool>,

    #[validate(range(min = 0, max = 100, message = "rollout_percentage must be between 0 and 100"))]
    pub rollout_percentage: Option<i32>,

    #[validate(length(max = 1000, message = "target_org_ids must contain at most 1000 ids"))]
    pub target_org_ids: Option<Vec<Uuid>>,
}

impl UpdateFeatureFlagRequest {
    pub fn has_updates(&self) -> bool {
        self.name.is_some()
            || self.description.is_some()
            || self.enabled.is_some()
            || self.rollout_percentage.is_some()
            || self.target_org_ids.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureFlagResponse {
    pub id: Uuid,
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    pub enabled: bool,
    pub rollout_percentage: i32,
    pub target_org_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FeatureFlagModel> for FeatureFlagResponse {
    fn from(flag: FeatureFlagModel) -> Self {
        Self {
            target_org_ids: flag.target_orgs(),
            id: flag.id,
            key: flag.key,
            name: flag.name,
            description: flag.description,
            enabled: flag.enabled,
            rollout_percentage: flag.rollout_percentage,
            created_at: flag.created_at,
            updated_at: flag.updated_at,
        }
    }
}

/// テナント向けの評価結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureFlagEvaluationResponse {
    pub key: String,
    pub enabled: bool,
}
