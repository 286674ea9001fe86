// src/api/mod.rs
use crate::config::AppConfig;
use crate::logging::request_context_middleware;
use crate::middleware::auth::{
    cors_layer, security_headers_middleware, superadmin_auth_middleware, tenant_auth_middleware,
    AuthMiddlewareConfig, SUPERADMIN_SESSION_COOKIE, TENANT_SESSION_COOKIE,
};
use crate::middleware::rate_limit::{
    rate_limit_middleware, RateLimitPolicy, RateLimitState, RateLimiter,
};
use crate::repository::{
    audit_log_repository::AuditLogRepository, benchmark_repository::BenchmarkRepository,
    billing_repository::BillingRepository, feature_flag_repository::FeatureFlagRepository,
    notification_repository::NotificationRepository,
    organization_repository::OrganizationRepository, role_repository::RoleRepository,
    scheduled_task_repository::ScheduledTaskRepository, settings_repository::SettingsRepository,
    user_repository::UserRepository, vendor_repository::VendorRepository,
    webhook_repository::WebhookRepository, work_order_repository::WorkOrderRepository,
};
use crate::service::{
    audit_log_service::AuditLogService, auth_service::AuthService,
    benchmark_service::BenchmarkService, billing_service::BillingService,
    bootstrap_service::BootstrapService, feature_flag_service::FeatureFlagService,
    notification_service::NotificationService, organization_service::OrganizationService,
    role_service::RoleService, scheduled_task_service::ScheduledTaskService,
    settings_service::SettingsService, user_service::UserService, vendor_service::VendorService,
    webhook_service::WebhookService, work_order_service::WorkOrderService,
};
use crate::utils::jwt::JwtManager;
use crate::utils::password::{PasswordManager, PasswordPolicy};
use axum::{
    middleware::{from_fn, from_fn_with_state},
    Router,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

pub mod dto;
pub mod handlers;

/// 統一されたアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub organization_service: Arc<OrganizationService>,
    pub user_service: Arc<UserService>,
    pub role_service: Arc<RoleService>,
    pub settings_service: Arc<SettingsService>,
    pub webhook_service: Arc<WebhookService>,
    pub feature_flag_service: Arc<FeatureFlagService>,
    pub scheduled_task_service: Arc<ScheduledTaskService>,
    pub notification_service: Arc<NotificationService>,
    pub billing_service: Arc<BillingService>,
    pub benchmark_service: Arc<BenchmarkService>,
    pub audit_log_service: Arc<AuditLogService>,
    pub vendor_service: Arc<VendorService>,
    pub work_order_service: Arc<WorkOrderService>,
    pub bootstrap_service: Arc<BootstrapService>,
    pub organization_repository: Arc<OrganizationRepository>,
    pub auth_middleware_config: AuthMiddlewareConfig,
    pub jwt_manager: Arc<JwtManager>,
    pub rate_limiter: RateLimiter,
    pub cookie_config: CookieConfig,
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
}

/// セッションCookie設定
#[derive(Clone, Debug)]
pub struct CookieConfig {
    pub superadmin_cookie_name: &'static str,
    pub tenant_cookie_name: &'static str,
    pub secure: bool,
    pub path: String,
    pub max_age_seconds: i64,
}

impl CookieConfig {
    pub fn from_app_config(app_config: &AppConfig, max_age_seconds: i64) -> Self {
        Self {
            superadmin_cookie_name: SUPERADMIN_SESSION_COOKIE,
            tenant_cookie_name: TENANT_SESSION_COOKIE,
            secure: app_config.security.cookie_secure,
            path: "/".to_string(),
            max_age_seconds,
        }
    }
}

impl AppState {
    /// リポジトリとサービスを組み立てる
    pub fn build(
        db: DatabaseConnection,
        app_config: &AppConfig,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let organization_repository = Arc::new(OrganizationRepository::new(db.clone()));
        let user_repository = Arc::new(UserRepository::new(db.clone()));
        let role_repository = Arc::new(RoleRepository::new(db.clone()));
        let billing_repository = Arc::new(BillingRepository::new(db.clone()));
        let vendor_repository = Arc::new(VendorRepository::new(db.clone()));

        let jwt_manager = Arc::new(JwtManager::new(app_config.jwt.clone())?);
        let password_manager = Arc::new(PasswordManager::new(
            &app_config.password_hash,
            PasswordPolicy::default(),
        )?);

        let audit_log_service = Arc::new(AuditLogService::new(Arc::new(
            AuditLogRepository::new(db.clone()),
        )));

        let webhook_service = WebhookService::new(
            Arc::new(WebhookRepository::new(db.clone())),
            organization_repository.clone(),
            audit_log_service.clone(),
            app_config.webhook_timeout_seconds,
        )?;

        Ok(Self {
            auth_service: Arc::new(AuthService::new(
                user_repository.clone(),
                organization_repository.clone(),
                password_manager.clone(),
                jwt_manager.clone(),
                audit_log_service.clone(),
            )),
            organization_service: Arc::new(OrganizationService::new(
                organization_repository.clone(),
                audit_log_service.clone(),
            )),
            user_service: Arc::new(UserService::new(
                user_repository.clone(),
                organization_repository.clone(),
                role_repository.clone(),
                password_manager,
                audit_log_service.clone(),
            )),
            role_service: Arc::new(RoleService::new(
                role_repository.clone(),
                user_repository.clone(),
                audit_log_service.clone(),
            )),
            settings_service: Arc::new(SettingsService::new(
                Arc::new(SettingsRepository::new(db.clone())),
                audit_log_service.clone(),
            )),
            webhook_service: Arc::new(webhook_service),
            feature_flag_service: Arc::new(FeatureFlagService::new(
                Arc::new(FeatureFlagRepository::new(db.clone())),
                audit_log_service.clone(),
            )),
            scheduled_task_service: Arc::new(ScheduledTaskService::new(
                Arc::new(ScheduledTaskRepository::new(db.clone())),
                audit_log_service.clone(),
            )),
            notification_service: Arc::new(NotificationService::new(
                Arc::new(NotificationRepository::new(db.clone())),
                organization_repository.clone(),
                audit_log_service.clone(),
            )),
            billing_service: Arc::new(BillingService::new(
                billing_repository.clone(),
                organization_repository.clone(),
                audit_log_service.clone(),
            )),
            benchmark_service: Arc::new(BenchmarkService::new(
                Arc::new(BenchmarkRepository::new(db.clone())),
                audit_log_service.clone(),
            )),
            vendor_service: Arc::new(VendorService::new(
                vendor_repository.clone(),
                audit_log_service.clone(),
            )),
            work_order_service: Arc::new(WorkOrderService::new(
                Arc::new(WorkOrderRepository::new(db.clone())),
                vendor_repository,
                audit_log_service.clone(),
            )),
            bootstrap_service: Arc::new(BootstrapService::new(
                user_repository.clone(),
                billing_repository,
            )),
            audit_log_service,
            organization_repository,
            auth_middleware_config: AuthMiddlewareConfig {
                jwt_manager: jwt_manager.clone(),
                user_repository,
                role_repository,
            },
            cookie_config: CookieConfig::from_app_config(
                app_config,
                jwt_manager.session_ttl_seconds(),
            ),
            jwt_manager,
            rate_limiter: RateLimiter::new(),
            db,
            config: Arc::new(app_config.clone()),
        })
    }

    fn rate_limit(&self, policy: RateLimitPolicy) -> RateLimitState {
        RateLimitState::new(self.rate_limiter.clone(), policy)
    }
}

/// アプリケーション全体のルーターを構築する
///
/// ルートグループごとに「レート制限 → 認証 → 権限」の順でレイヤーを重ねる。
/// 権限チェックは各ルートの `route_layer` で行い、テナント解決はハンドラーの抽出器で行う。
pub fn create_app(state: AppState) -> Router {
    let settings = state.config.rate_limit.clone();

    let auth_routes = handlers::auth_handler::login_routes().layer(from_fn_with_state(
        state.rate_limit(RateLimitPolicy::auth(&settings)),
        rate_limit_middleware,
    ));

    let superadmin_routes = Router::new()
        .merge(handlers::auth_handler::superadmin_session_routes())
        .merge(handlers::organization_handler::organization_routes())
        .merge(handlers::user_handler::user_routes())
        .merge(handlers::role_handler::role_routes())
        .merge(handlers::settings_handler::settings_routes())
        .merge(handlers::webhook_handler::webhook_routes())
        .merge(handlers::feature_flag_handler::feature_flag_routes())
        .merge(handlers::scheduled_task_handler::scheduled_task_routes())
        .merge(handlers::notification_handler::notification_admin_routes())
        .merge(handlers::billing_handler::billing_routes())
        .merge(handlers::benchmark_handler::benchmark_routes())
        .merge(handlers::audit_log_handler::audit_log_routes())
        .layer(from_fn_with_state(
            state.auth_middleware_config.clone(),
            superadmin_auth_middleware,
        ))
        .layer(from_fn_with_state(
            state.rate_limit(RateLimitPolicy::superadmin(&settings)),
            rate_limit_middleware,
        ));

    let tenant_routes = Router::new()
        .merge(handlers::auth_handler::tenant_session_routes())
        .merge(handlers::vendor_handler::vendor_routes())
        .merge(handlers::work_order_handler::work_order_routes())
        .merge(handlers::notification_handler::notification_tenant_routes())
        .merge(handlers::feature_flag_handler::feature_flag_tenant_routes())
        .layer(from_fn_with_state(
            state.auth_middleware_config.clone(),
            tenant_auth_middleware,
        ))
        .layer(from_fn_with_state(
            state.rate_limit(RateLimitPolicy::api(&settings)),
            rate_limit_middleware,
        ));

    let public_routes = handlers::settings_handler::public_branding_routes()
        .merge(handlers::auth_handler::logout_routes())
        .layer(from_fn_with_state(
            state.rate_limit(RateLimitPolicy::api(&settings)),
            rate_limit_middleware,
        ));

    let security = &state.config.security;
    let body_limit = security.body_limit;
    let request_timeout = Duration::from_secs(security.request_timeout_seconds);
    let cors = cors_layer(&state.config);

    Router::new()
        .merge(handlers::system_handler::system_routes())
        .merge(auth_routes)
        .merge(superadmin_routes)
        .merge(tenant_routes)
        .merge(public_routes)
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(from_fn(security_headers_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(request_context_middleware))
}
