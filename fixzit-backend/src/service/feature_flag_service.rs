// src/service/feature_flag_service.rs
use crate::api::dto::feature_flag_dto::{
    CreateFeatureFlagRequest, FeatureFlagEvaluationResponse, FeatureFlagResponse,
    UpdateFeatureFlagRequest,
};
use crate::domain::audit_log_model::{AuditAction, AuditActor, AuditEntry};
use crate::domain::feature_flag_model;
use crate::error::AppResult;
use crate::repository::feature_flag_repository::FeatureFlagRepository;
use crate::service::audit_log_service::AuditLogService;
use crate::utils::error_helper::{conflict_error, not_found_error};
use chrono::Utc;
use sea_orm::Set;
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

pub struct FeatureFlagService {
    flag_repo: Arc<FeatureFlagRepository>,
    audit_service: Arc<AuditLogService>,
}

impl FeatureFlagService {
    pub fn new(flag_repo: Arc<FeatureFlagRepository>, audit_service: Arc<AuditLogService>) -> Self {
        Self {
            flag_repo,
            audit_service,
        }
    }

    pub async fn list(&self) -> AppResult<Vec<FeatureFlagResponse>> {
        let flags = self.flag_repo.find_all().await?;
        Ok(flags.into_iter().map(FeatureFlagResponse::from).collect())
    }

    pub async fn create(
        &self,
        request: CreateFeatureFlagRequest,
        actor: AuditActor,
    ) -> AppResult<FeatureFlagResponse> {
        if self.flag_repo.find_by_key(&request.key).await?.is_some() {
            return Err(conflict_error(
                &format!("Feature flag '{}' already exists", request.key),
                "feature_flag_service::create",
            ));
        }

        let now = Utc::now();
        let flag = self
            .flag_repo
            .create(feature_flag_model::ActiveModel {
                id: Set(Uuid::new_v4()),
                key: Set(request.key),
                name: Set(request.name.trim().to_string()),
                description: Set(request.description),
                enabled: Set(request.enabled.unwrap_or(false)),
                rollout_percentage: Set(request.rollout_percentage.unwrap_or(0)),
                target_org_ids: Set(json!(unique_orgs(request.target_org_ids.unwrap_or_default()))),
                created_at: Set(now),
                updated_at: Set(now),
            })
            .await?;

        info!(flag_key = %flag.key, enabled = flag.enabled, "Feature flag created");
        self.audit_service
            .record(
                AuditEntry::new(actor, AuditAction::Create, "feature_flag")
                    .entity_id(flag.id)
                    .details(json!({
                        "key": flag.key,
                        "enabled": flag.enabled,
                        "rollout_percentage": flag.rollout_percentage,
                    })),
            )
            .await;

        Ok(flag.into())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateFeatureFlagRequest,
        actor: AuditActor,
    ) -> AppResult<FeatureFlagResponse> {
        let current = self.find(id).await?;
        let mut active: feature_flag_model::ActiveModel = current.into();

        if let Some(name) = request.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(description) = request.description {
            active.description = Set(description);
        }
        if let Some(enabled) = request.enabled {
            active.enabled = Set(enabled);
        }
        if let Some(rollout) = request.rollout_percentage {
            active.rollout_percentage = Set(rollout);
        }
        if let Some(targets) = request.target_org_ids {
            active.target_org_ids = Set(json!(unique_orgs(targets)));
        }

        let flag = self.flag_repo.update(active).await?;
        self.audit_service
            .record(
                AuditEntry::new(actor, AuditAction::Update, "feature_flag")
                    .entity_id(flag.id)
                    .details(json!({
                        "key": flag.key,
                        "enabled": flag.enabled,
                        "rollout_percentage": flag.rollout_percentage,
                    })),
            )
            .await;

        Ok(flag.into())
    }

    pub async fn delete(&self, id: Uuid, actor: AuditActor) -> AppResult<()> {
        let flag = self.find(id).await?;
        self.flag_repo.delete(id).await?;

        self.audit_service
            .record(
                AuditEntry::new(actor, AuditAction::Delete, "feature_flag")
                    .entity_id(id)
                    .details(json!({ "key": flag.key })),
            )
            .await;
        Ok(())
    }

    /// 未登録のキーは無効として扱う
    pub async fn evaluate(&self, key: &str, org_id: Uuid) -> AppResult<FeatureFlagEvaluationResponse> {
        let enabled = match self.flag_repo.find_by_key(key).await? {
            Some(flag) => flag.is_enabled_for(org_id),
            None => false,
        };
        debug!(flag_key = %key, org_id = %org_id, enabled = enabled, "Feature flag evaluated");

        Ok(FeatureFlagEvaluationResponse {
            key: key.to_string(),
            enabled,
        })
    }

    async fn find(&self, id: Uuid) -> AppResult<feature_flag_model::Model> {
        self.flag_repo.find_by_id(id).await?.ok_or_else(|| {
            not_found_error("Feature flag", &id.to_string(), "feature_flag_service::find")
        })
    }
}

fn unique_orgs(ids: Vec<Uuid>) -> Vec<Uuid> {
    ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect()
}
