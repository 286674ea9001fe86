// src/service/settings_service.rs
use crate::api::dto::branding_dto::UpdateBrandingRequest;
use crate::api::dto::settings_dto::{SettingListQuery, SettingResponse, UpsertSettingRequest};
use crate::domain::audit_log_model::{AuditAction, AuditActor, AuditEntry};
use crate::domain::branding_model::{self, BRANDING_ROW_ID};
use crate::domain::platform_setting_model::{self, SettingValueType};
use crate::error::AppResult;
use crate::repository::settings_repository::SettingsRepository;
use crate::service::audit_log_service::AuditLogService;
use crate::utils::error_helper::{not_found_error, parse_field, validation_error};
use crate::utils::search::{matches_ci, sanitize_search};
use crate::utils::validation::validate_setting_key;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// プラットフォーム設定・ブランディング
pub struct SettingsService {
    settings_repo: Arc<SettingsRepository>,
    audit_service: Arc<AuditLogService>,
}

impl SettingsService {
    pub fn new(settings_repo: Arc<SettingsRepository>, audit_service: Arc<AuditLogService>) -> Self {
        Self {
            settings_repo,
            audit_service,
        }
    }

    /// 件数が少ないため検索はメモリ上で行う
    pub async fn list(&self, query: &SettingListQuery) -> AppResult<Vec<SettingResponse>> {
        let search = query.search.as_deref().and_then(sanitize_search);
        let settings = self.settings_repo.find_all().await?;
        Ok(settings
            .into_iter()
            .filter(|setting| match &search {
                Some(term) => {
                    matches_ci(&setting.key, term)
                        || setting
                            .description
                            .as_deref()
                            .is_some_and(|description| matches_ci(description, term))
                }
                None => true,
            })
            .map(SettingResponse::from)
            .collect())
    }

    pub async fn get(&self, key: &str) -> AppResult<SettingResponse> {
        let key = normalize_key(key)?;
        let setting = self
            .settings_repo
            .find_by_key(&key)
            .await?
            .ok_or_else(|| not_found_error("Setting", &key, "settings_service::get"))?;
        Ok(setting.into())
    }

    /// 新規作成か更新かを返す（ハンドラーで201/200を切り替える）
    pub async fn upsert(
        &self,
        key: &str,
        request: UpsertSettingRequest,
        actor: AuditActor,
    ) -> AppResult<(SettingResponse, bool)> {
        let key = normalize_key(key)?;
        let existing = self.settings_repo.find_by_key(&key).await?;

        let value_type = match (&request.value_type, &existing) {
            (Some(value), _) => parse_field::<SettingValueType>("value_type", value)?,
            (None, Some(current)) => parse_field::<SettingValueType>("value_type", &current.value_type)?,
            (None, None) => SettingValueType::String,
        };
        value_type
            .check(&request.value)
            .map_err(|message| validation_error("value", &message))?;

        let now = Utc::now();
        let created = existing.is_none();
        let setting = match existing {
            Some(current) => {
                let mut active: platform_setting_model::ActiveModel = current.into();
                active.value = Set(request.value);
                active.value_type = Set(value_type.as_str().to_string());
                if let Some(description) = request.description {
                    active.description = Set(Some(description));
                }
                active.updated_by = Set(actor.user_id);
                active.updated_at = Set(now);
                self.settings_repo.update_setting(active).await?
            }
            None => {
                self.settings_repo
                    .insert_setting(platform_setting_model::ActiveModel {
                        key: Set(key.clone()),
                        value: Set(request.value),
                        value_type: Set(value_type.as_str().to_string()),
                        description: Set(request.description),
                        updated_by: Set(actor.user_id),
                        updated_at: Set(now),
                    })
                    .await?
            }
        };

        info!(key = %setting.key, created = created, "Platform setting saved");
        let action = if created {
            AuditAction::Create
        } else {
            AuditAction::Update
        };
        self.audit_service
            .record(
                AuditEntry::new(actor, action, "platform_setting")
                    .entity_id(&setting.key)
                    .details(json!({ "value_type": setting.value_type })),
            )
            .await;

        Ok((setting.into(), created))
    }

    pub async fn delete(&self, key: &str, actor: AuditActor) -> AppResult<()> {
        let key = normalize_key(key)?;
        let deleted = self.settings_repo.delete_setting(&key).await?;
        if deleted == 0 {
            return Err(not_found_error("Setting", &key, "settings_service::delete"));
        }

        self.audit_service
            .record(AuditEntry::new(actor, AuditAction::Delete, "platform_setting").entity_id(&key))
            .await;
        Ok(())
    }

    /// 未設定なら既定値を返す
    pub async fn branding(&self) -> AppResult<branding_model::Model> {
        Ok(self
            .settings_repo
            .find_branding()
            .await?
            .unwrap_or_else(branding_model::Model::platform_default))
    }

    pub async fn update_branding(
        &self,
        request: UpdateBrandingRequest,
        actor: AuditActor,
    ) -> AppResult<branding_model::Model> {
        let existing = self.settings_repo.find_branding().await?;
        let is_new = existing.is_none();
        let base = existing.unwrap_or_else(branding_model::Model::platform_default);

        let mut active: branding_model::ActiveModel = base.into();
        if is_new {
            // 既定値の列もINSERT対象にする
            active = active.reset_all();
        }
        if let Some(name) = &request.company_name {
            active.company_name = Set(name.trim().to_string());
        }
        if let Some(logo_url) = request.logo_url.clone() {
            active.logo_url = Set(logo_url);
        }
        if let Some(favicon_url) = request.favicon_url.clone() {
            active.favicon_url = Set(favicon_url);
        }
        if let Some(color) = &request.primary_color {
            active.primary_color = Set(color.to_ascii_lowercase());
        }
        if let Some(color) = &request.secondary_color {
            active.secondary_color = Set(color.to_ascii_lowercase());
        }
        if let Some(email) = request.support_email.clone() {
            active.support_email = Set(email.map(|e| e.trim().to_lowercase()));
        }
        active.id = Set(BRANDING_ROW_ID);
        active.updated_by = Set(actor.user_id);
        active.updated_at = Set(Utc::now());

        let branding = if is_new {
            self.settings_repo.insert_branding(active).await?
        } else {
            self.settings_repo.update_branding(active).await?
        };

        info!(company_name = %branding.company_name, "Branding updated");
        self.audit_service
            .record(
                AuditEntry::new(actor, AuditAction::Update, "branding")
                    .entity_id(BRANDING_ROW_ID)
                    .details(json!({
                        "company_name": branding.company_name,
                        "primary_color": branding.primary_color,
                        "secondary_color": branding.secondary_color,
                    })),
            )
            .await;

        Ok(branding)
    }
}

fn normalize_key(key: &str) -> AppResult<String> {
    let key = key.trim().to_string();
    validate_setting_key(&key).map_err(|e| {
        validation_error(
            "key",
            &e.message.map_or_else(|| "invalid setting key".to_string(), |m| m.to_string()),
        )
    })?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key(" billing.currency ").unwrap(), "billing.currency");
        assert!(normalize_key("Billing").is_err());
        assert!(normalize_key("x").is_err());
    }
}
