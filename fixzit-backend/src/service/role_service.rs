// src/service/role_service.rs
use crate::api::dto::role_dto::{
    CreateRoleRequest, RoleMatrixResponse, RoleResponse, UpdateRoleRequest,
};
use crate::domain::audit_log_model::{AuditAction, AuditActor, AuditEntry};
use crate::domain::capability::{Action, Capability, Module};
use crate::domain::permission::permission_summary;
use crate::domain::role::RoleName;
use crate::domain::role_model;
use crate::error::AppResult;
use crate::repository::role_repository::RoleRepository;
use crate::repository::user_repository::UserRepository;
use crate::service::audit_log_service::AuditLogService;
use crate::utils::error_helper::{conflict_error, forbidden_error, not_found_error};
use chrono::Utc;
use sea_orm::Set;
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct RoleService {
    role_repo: Arc<RoleRepository>,
    user_repo: Arc<UserRepository>,
    audit_service: Arc<AuditLogService>,
}

impl RoleService {
    pub fn new(
        role_repo: Arc<RoleRepository>,
        user_repo: Arc<UserRepository>,
        audit_service: Arc<AuditLogService>,
    ) -> Self {
        Self {
            role_repo,
            user_repo,
            audit_service,
        }
    }

    pub async fn list(&self) -> AppResult<Vec<RoleResponse>> {
        let roles = self.role_repo.find_all().await?;
        Ok(roles.into_iter().map(RoleResponse::from).collect())
    }

    pub async fn get(&self, id: Uuid) -> AppResult<RoleResponse> {
        Ok(self.find(id).await?.into())
    }

    /// 組み込みロールごとの権限一覧
    pub fn matrix(&self) -> RoleMatrixResponse {
        RoleMatrixResponse {
            modules: Module::ALL.iter().map(|m| m.as_str()).collect(),
            actions: Action::ALL.iter().map(|a| a.as_str()).collect(),
            roles: permission_summary(),
        }
    }

    pub async fn create(
        &self,
        request: CreateRoleRequest,
        actor: AuditActor,
    ) -> AppResult<RoleResponse> {
        let name = request.name.trim().to_string();
        self.ensure_name_available(&name, None).await?;

        let permissions = normalize_permissions(&request.permissions);
        let now = Utc::now();
        let role = self
            .role_repo
            .create(role_model::ActiveModel {
                id: Set(Uuid::new_v4()),
                name: Set(name),
                description: Set(request.description),
                permissions: Set(json!(permissions)),
                is_system: Set(false),
                created_at: Set(now),
                updated_at: Set(now),
            })
            .await?;

        info!(role_id = %role.id, name = %role.name, "Custom role created");
        self.audit_service
            .record(
                AuditEntry::new(actor, AuditAction::Create, "role")
                    .entity_id(role.id)
                    .details(json!({ "name": role.name, "permissions": permissions })),
            )
            .await;

        Ok(role.into())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateRoleRequest,
        actor: AuditActor,
    ) -> AppResult<RoleResponse> {
        let current = self.find(id).await?;
        if current.is_system {
            return Err(forbidden_error(
                "System roles cannot be modified",
                "role_service::update",
                actor.user_id.map(|id| id.to_string()).as_deref(),
            ));
        }

        let mut active: role_model::ActiveModel = current.into();
        if let Some(name) = request.name {
            let name = name.trim().to_string();
            self.ensure_name_available(&name, Some(id)).await?;
            active.name = Set(name);
        }
        if let Some(description) = request.description {
            active.description = Set(description);
        }
        if let Some(permissions) = &request.permissions {
            active.permissions = Set(json!(normalize_permissions(permissions)));
        }

        let role = self.role_repo.update(active).await?;
        self.audit_service
            .record(
                AuditEntry::new(actor, AuditAction::Update, "role")
                    .entity_id(role.id)
                    .details(json!({ "name": role.name, "permissions": role.permission_strings() })),
            )
            .await;

        Ok(role.into())
    }

    pub async fn delete(&self, id: Uuid, actor: AuditActor) -> AppResult<()> {
        let role = self.find(id).await?;
        if role.is_system {
            return Err(forbidden_error(
                "System roles cannot be deleted",
                "role_service::delete",
                actor.user_id.map(|id| id.to_string()).as_deref(),
            ));
        }

        let assigned = self.user_repo.count_by_custom_role(id).await?;
        if assigned > 0 {
            return Err(conflict_error(
                &format!("Role is assigned to {} user(s)", assigned),
                "role_service::delete",
            ));
        }

        self.role_repo.delete(id).await?;
        info!(role_id = %id, "Custom role deleted");
        self.audit_service
            .record(
                AuditEntry::new(actor, AuditAction::Delete, "role")
                    .entity_id(id)
                    .details(json!({ "name": role.name })),
            )
            .await;

        Ok(())
    }

    /// 組み込みロール名と既存カスタムロール名の重複を拒否
    async fn ensure_name_available(&self, name: &str, current_id: Option<Uuid>) -> AppResult<()> {
        if name.parse::<RoleName>().is_ok() {
            return Err(conflict_error(
                &format!("'{}' is a built-in role name", name),
                "role_service::ensure_name_available",
            ));
        }
        if let Some(existing) = self.role_repo.find_by_name(name).await? {
            if Some(existing.id) != current_id {
                return Err(conflict_error(
                    &format!("Role '{}' already exists", name),
                    "role_service::ensure_name_available",
                ));
            }
        }
        Ok(())
    }

    async fn find(&self, id: Uuid) -> AppResult<role_model::Model> {
        self.role_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Role", &id.to_string(), "role_service::find"))
    }
}

/// 重複を除き正規の表記に揃える
fn normalize_permissions(values: &[String]) -> Vec<String> {
    values
        .iter()
        .filter_map(|v| v.parse::<Capability>().ok())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|c| c.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_permissions_dedupes_and_sorts() {
        let values = vec![
            "VENDOR:VIEW".to_string(),
            " WORK_ORDER:CREATE ".to_string(),
            "VENDOR:VIEW".to_string(),
        ];
        let normalized = normalize_permissions(&values);
        assert_eq!(normalized.len(), 2);
        assert!(normalized.contains(&"VENDOR:VIEW".to_string()));
        assert!(normalized.contains(&"WORK_ORDER:CREATE".to_string()));
    }
}
