// src/service/user_service.rs
use crate::api::dto::user_dto::{
    BulkStatusRequest, BulkStatusResponse, CreateUserRequest, UpdateUserRequest, UserListQuery,
    UserResponse,
};
use crate::domain::audit_log_model::{AuditAction, AuditActor, AuditEntry};
use crate::domain::role::RoleName;
use crate::domain::user_model::{self, UserStatus};
use crate::error::{AppError, AppResult};
use crate::repository::organization_repository::OrganizationRepository;
use crate::repository::role_repository::RoleRepository;
use crate::repository::user_repository::{UserFilter, UserRepository};
use crate::service::audit_log_service::AuditLogService;
use crate::types::PaginatedResponse;
use crate::utils::error_helper::{
    conflict_error, forbidden_error, internal_server_error, not_found_error, parse_field,
};
use crate::utils::password::{PasswordError, PasswordManager};
use crate::utils::search::sanitize_search;
use chrono::Utc;
use sea_orm::Set;
use serde_json::json;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// ユーザー管理サービス
pub struct UserService {
    user_repo: Arc<UserRepository>,
    org_repo: Arc<OrganizationRepository>,
    role_repo: Arc<RoleRepository>,
    password_manager: Arc<PasswordManager>,
    audit_service: Arc<AuditLogService>,
}

impl UserService {
    pub fn new(
        user_repo: Arc<UserRepository>,
        org_repo: Arc<OrganizationRepository>,
        role_repo: Arc<RoleRepository>,
        password_manager: Arc<PasswordManager>,
        audit_service: Arc<AuditLogService>,
    ) -> Self {
        Self {
            user_repo,
            org_repo,
            role_repo,
            password_manager,
            audit_service,
        }
    }

    pub async fn list(&self, query: &UserListQuery) -> AppResult<PaginatedResponse<UserResponse>> {
        let role = match &query.role {
            Some(value) => Some(parse_field::<RoleName>("role", value)?),
            None => None,
        };
        let status = match &query.status {
            Some(value) => Some(parse_field::<UserStatus>("status", value)?),
            None => None,
        };

        let filter = UserFilter {
            search: query.search.as_deref().and_then(sanitize_search),
            org_id: query.org_id,
            role: role.map(|r| r.as_str().to_string()),
            status: status.map(|s| s.as_str().to_string()),
        };
        let (page, per_page) = query.pagination().get_pagination();

        let (users, total) = self.user_repo.list(&filter, page, per_page).await?;
        let items = users.into_iter().map(UserResponse::from).collect();
        Ok(PaginatedResponse::new(items, page, per_page, total))
    }

    pub async fn get(&self, id: Uuid) -> AppResult<UserResponse> {
        Ok(self.find(id).await?.into())
    }

    /// テナントユーザーの作成（スーパー管理者はここでは作らない）
    pub async fn create(
        &self,
        request: CreateUserRequest,
        actor: AuditActor,
    ) -> AppResult<UserResponse> {
        let role = parse_field::<RoleName>("role", &request.role)?;
        if role.is_super_admin() {
            return Err(forbidden_error(
                "Superadmin accounts cannot be created through this endpoint",
                "user_service::create",
                actor.user_id.map(|id| id.to_string()).as_deref(),
            ));
        }

        let email = request.email.trim().to_lowercase();
        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(conflict_error(
                "Email address is already registered",
                "user_service::create",
            ));
        }

        let org = self.org_repo.find_by_id(request.org_id).await?.ok_or_else(|| {
            not_found_error("Organization", &request.org_id.to_string(), "user_service::create")
        })?;
        let member_count = self.user_repo.count_by_org(org.id).await?;
        if member_count >= org.max_users.max(0) as u64 {
            return Err(conflict_error(
                &format!("Organization has reached its user limit ({})", org.max_users),
                "user_service::create",
            ));
        }

        if let Some(role_id) = request.custom_role_id {
            self.ensure_custom_role_exists(role_id).await?;
        }

        let password_hash = self
            .password_manager
            .hash_password(&request.password)
            .map_err(|e| match e {
                PasswordError::WeakPassword(message) => {
                    AppError::ValidationError(format!("password: {}", message))
                }
                other => internal_server_error(other, "user_service::create", "Failed to create user"),
            })?;

        let now = Utc::now();
        let user = self
            .user_repo
            .create(user_model::ActiveModel {
                id: Set(Uuid::new_v4()),
                org_id: Set(Some(org.id)),
                email: Set(email),
                full_name: Set(request.full_name.trim().to_string()),
                password_hash: Set(password_hash),
                role: Set(role.as_str().to_string()),
                custom_role_id: Set(request.custom_role_id),
                status: Set(UserStatus::Active.as_str().to_string()),
                last_login_at: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
            })
            .await?;

        info!(user_id = %user.id, org_id = %org.id, role = %user.role, "User created");
        self.audit_service
            .record(
                AuditEntry::new(actor, AuditAction::Create, "user")
                    .entity_id(user.id)
                    .org_id(user.org_id)
                    .details(json!({ "email": user.email, "role": user.role })),
            )
            .await;

        Ok(user.into())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateUserRequest,
        actor: AuditActor,
    ) -> AppResult<UserResponse> {
        let current = self.find(id).await?;

        // スーパー管理者のステータス・ロールは変更不可
        if current.is_super_admin() && (request.status.is_some() || request.role.is_some()) {
            return Err(forbidden_error(
                "Superadmin status and role cannot be changed",
                "user_service::update",
                actor.user_id.map(|id| id.to_string()).as_deref(),
            ));
        }

        let mut changes = serde_json::Map::new();
        let previous_status = current.status.clone();
        let mut active: user_model::ActiveModel = current.into();

        if let Some(name) = request.full_name {
            let name = name.trim().to_string();
            changes.insert("full_name".into(), json!(name));
            active.full_name = Set(name);
        }
        if let Some(role) = &request.role {
            let role = parse_field::<RoleName>("role", role)?;
            if role.is_super_admin() {
                return Err(forbidden_error(
                    "Users cannot be promoted to superadmin",
                    "user_service::update",
                    actor.user_id.map(|id| id.to_string()).as_deref(),
                ));
            }
            changes.insert("role".into(), json!(role));
            active.role = Set(role.as_str().to_string());
        }
        if let Some(status) = &request.status {
            let status = parse_field::<UserStatus>("status", status)?;
            changes.insert("status".into(), json!(status));
            active.status = Set(status.as_str().to_string());
        }
        if let Some(custom_role_id) = request.custom_role_id {
            if let Some(role_id) = custom_role_id {
                self.ensure_custom_role_exists(role_id).await?;
            }
            changes.insert("custom_role_id".into(), json!(custom_role_id));
            active.custom_role_id = Set(custom_role_id);
        }

        let user = self.user_repo.update(active).await?;

        let action = if user.status != previous_status {
            AuditAction::StatusChange
        } else {
            AuditAction::Update
        };
        self.audit_service
            .record(
                AuditEntry::new(actor, action, "user")
                    .entity_id(user.id)
                    .org_id(user.org_id)
                    .details(serde_json::Value::Object(changes)),
            )
            .await;

        Ok(user.into())
    }

    /// 一括ステータス変更。スーパー管理者は対象外として結果に含める
    pub async fn bulk_update_status(
        &self,
        request: BulkStatusRequest,
        actor: AuditActor,
    ) -> AppResult<BulkStatusResponse> {
        let status = parse_field::<UserStatus>("status", &request.status)?;

        // 重複IDは1件として扱う（順序は保持）
        let mut seen = BTreeSet::new();
        let requested_ids: Vec<Uuid> = request
            .user_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();

        let found: HashMap<Uuid, user_model::Model> = self
            .user_repo
            .find_by_ids(&requested_ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();

        let mut eligible = Vec::new();
        let mut skipped_super_admins = Vec::new();
        let mut not_found = Vec::new();
        for id in &requested_ids {
            match found.get(id) {
                Some(user) if user.is_super_admin() => skipped_super_admins.push(*id),
                Some(_) => eligible.push(*id),
                None => not_found.push(*id),
            }
        }

        if !skipped_super_admins.is_empty() {
            warn!(
                count = skipped_super_admins.len(),
                "Bulk status change skipped superadmin accounts"
            );
        }

        let updated = self
            .user_repo
            .update_status_many(&eligible, status.as_str())
            .await?;

        info!(
            requested = requested_ids.len(),
            updated = updated,
            status = %status,
            "Bulk user status change completed"
        );
        self.audit_service
            .record(
                AuditEntry::new(actor, AuditAction::BulkStatusChange, "user").details(json!({
                    "status": status,
                    "requested": requested_ids.len(),
                    "updated": updated,
                    "user_ids": eligible,
                    "skipped_super_admins": skipped_super_admins,
                    "not_found": not_found,
                })),
            )
            .await;

        Ok(BulkStatusResponse {
            requested: requested_ids.len(),
            updated,
            skipped_super_admins,
            not_found,
        })
    }

    async fn find(&self, id: Uuid) -> AppResult<user_model::Model> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("User", &id.to_string(), "user_service::find"))
    }

    async fn ensure_custom_role_exists(&self, role_id: Uuid) -> AppResult<()> {
        if self.role_repo.find_by_id(role_id).await?.is_none() {
            return Err(not_found_error(
                "Role",
                &role_id.to_string(),
                "user_service::ensure_custom_role_exists",
            ));
        }
        Ok(())
    }
}
