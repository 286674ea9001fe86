// src/service/auth_service.rs
use crate::api::dto::auth_dto::{LoginRequest, LoginResponse, SessionUserResponse};
use crate::domain::audit_log_model::{AuditAction, AuditActor, AuditEntry, AuditResult};
use crate::domain::user_model::Model as UserModel;
use crate::error::{AppError, AppResult};
use crate::repository::organization_repository::OrganizationRepository;
use crate::repository::user_repository::UserRepository;
use crate::service::audit_log_service::AuditLogService;
use crate::utils::error_helper::internal_server_error;
use crate::utils::jwt::{JwtManager, SessionClaims, SessionKind, SessionSubject};
use crate::utils::password::PasswordManager;
use chrono::{TimeZone, Utc};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// 認証サービス
pub struct AuthService {
    user_repo: Arc<UserRepository>,
    org_repo: Arc<OrganizationRepository>,
    password_manager: Arc<PasswordManager>,
    jwt_manager: Arc<JwtManager>,
    audit_service: Arc<AuditLogService>,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<UserRepository>,
        org_repo: Arc<OrganizationRepository>,
        password_manager: Arc<PasswordManager>,
        jwt_manager: Arc<JwtManager>,
        audit_service: Arc<AuditLogService>,
    ) -> Self {
        Self {
            user_repo,
            org_repo,
            password_manager,
            jwt_manager,
            audit_service,
        }
    }

    // --- ログイン ---

    /// スーパー管理者ログイン
    pub async fn superadmin_login(
        &self,
        request: LoginRequest,
        actor: AuditActor,
    ) -> AppResult<LoginResponse> {
        let user = self.verify_credentials(&request, &actor).await?;

        if !user.is_super_admin() {
            self.record_failure(&actor, &request.email, Some(&user), "not_super_admin")
                .await;
            warn!(user_id = %user.id, "Non-superadmin attempted superadmin login");
            return Err(AppError::Forbidden("Superadmin access required".to_string()));
        }

        self.issue_session(user, SessionKind::SuperAdmin, actor).await
    }

    /// テナント利用者ログイン
    pub async fn tenant_login(
        &self,
        request: LoginRequest,
        actor: AuditActor,
    ) -> AppResult<LoginResponse> {
        let user = self.verify_credentials(&request, &actor).await?;

        if let Some(org_id) = user.org_id {
            let suspended = self
                .org_repo
                .find_by_id(org_id)
                .await?
                .is_some_and(|org| org.is_suspended());
            if suspended {
                self.record_failure(&actor, &request.email, Some(&user), "organization_suspended")
                    .await;
                return Err(AppError::Forbidden("Organization is suspended".to_string()));
            }
        }

        self.issue_session(user, SessionKind::Tenant, actor).await
    }

    /// ログアウト（Cookie削除はハンドラー側）
    pub async fn logout(&self, claims: &SessionClaims, actor: AuditActor) {
        self.audit_service
            .record(
                AuditEntry::new(actor, AuditAction::Logout, "session")
                    .entity_id(claims.sub)
                    .org_id(claims.org_id),
            )
            .await;
        info!(user_id = %claims.sub, "User logged out");
    }

    // --- 内部処理 ---

    async fn verify_credentials(
        &self,
        request: &LoginRequest,
        actor: &AuditActor,
    ) -> AppResult<UserModel> {
        let user = match self.user_repo.find_by_email(&request.email).await? {
            Some(user) => user,
            None => {
                self.password_manager.verify_against_dummy(&request.password);
                self.record_failure(actor, &request.email, None, "unknown_email")
                    .await;
                return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        };

        let password_ok = self
            .password_manager
            .verify_password(&request.password, &user.password_hash)
            .map_err(|e| internal_server_error(e, "auth_service::verify_credentials", "Login failed"))?;
        if !password_ok {
            self.record_failure(actor, &request.email, Some(&user), "invalid_password")
                .await;
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        if !user.is_active() {
            self.record_failure(actor, &request.email, Some(&user), "account_inactive")
                .await;
            return Err(AppError::Forbidden(format!(
                "Account is {}",
                user.status
            )));
        }

        Ok(user)
    }

    async fn issue_session(
        &self,
        user: UserModel,
        kind: SessionKind,
        actor: AuditActor,
    ) -> AppResult<LoginResponse> {
        let subject = SessionSubject {
            user_id: user.id,
            email: user.email.clone(),
            role: user.role_name(),
            org_id: user.org_id,
        };
        let (token, claims) = self
            .jwt_manager
            .generate_session_token(&subject, kind)
            .map_err(|e| internal_server_error(e, "auth_service::issue_session", "Login failed"))?;

        self.user_repo.touch_last_login(user.id).await?;

        let actor = AuditActor {
            user_id: Some(user.id),
            email: Some(user.email.clone()),
            role: Some(user.role.clone()),
            ..actor
        };
        self.audit_service
            .record(
                AuditEntry::new(actor, AuditAction::Login, "session")
                    .entity_id(user.id)
                    .org_id(user.org_id)
                    .details(json!({ "kind": kind })),
            )
            .await;

        info!(user_id = %user.id, role = %user.role, kind = ?kind, "User logged in");

        Ok(LoginResponse {
            user: SessionUserResponse::from(&user),
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_manager.session_ttl_seconds(),
            expires_at: Utc
                .timestamp_opt(claims.exp, 0)
                .single()
                .unwrap_or_else(Utc::now),
        })
    }

    async fn record_failure(
        &self,
        actor: &AuditActor,
        email: &str,
        user: Option<&UserModel>,
        reason: &str,
    ) {
        let actor = AuditActor {
            user_id: user.map(|u| u.id),
            email: Some(email.trim().to_lowercase()),
            role: user.map(|u| u.role.clone()),
            ..actor.clone()
        };
        let mut entry = AuditEntry::new(actor, AuditAction::LoginFailed, "session")
            .result(AuditResult::Failure)
            .details(json!({ "reason": reason }));
        if let Some(user) = user {
            entry = entry.entity_id(user.id).org_id(user.org_id);
        }
        self.audit_service.record(entry).await;
    }
}
