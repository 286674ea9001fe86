// src/api/handlers/auth_handler.rs
use crate::api::dto::auth_dto::{LoginRequest, LoginResponse, SessionInfoResponse};
use crate::api::{AppState, CookieConfig};
use crate::domain::audit_log_model::AuditActor;
use crate::error::AppResult;
use crate::extractors::ValidatedJson;
use crate::middleware::auth::{extract_token, AuthenticatedUser};
use crate::types::ApiResponse;
use axum::{
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub logged_out: bool,
}

fn session_cookie(name: &'static str, token: String, config: &CookieConfig) -> Cookie<'static> {
    Cookie::build((name, token))
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Strict)
        .path(config.path.clone())
        .max_age(time::Duration::seconds(config.max_age_seconds))
        .build()
}

fn expired_cookie(name: &'static str, config: &CookieConfig) -> Cookie<'static> {
    Cookie::build((name, ""))
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Strict)
        .path(config.path.clone())
        .max_age(time::Duration::ZERO)
        .build()
}

// --- スーパー管理者 ---

/// スーパー管理者ログイン
pub async fn superadmin_login_handler(
    State(app_state): State<AppState>,
    actor: AuditActor,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<(CookieJar, ApiResponse<LoginResponse>)> {
    let response = app_state
        .auth_service
        .superadmin_login(payload, actor)
        .await?;

    let cookie = session_cookie(
        app_state.cookie_config.superadmin_cookie_name,
        response.token.clone(),
        &app_state.cookie_config,
    );
    Ok((jar.add(cookie), ApiResponse::success(response)))
}

/// スーパー管理者ログアウト。トークンが有効なら監査ログを残す
pub async fn superadmin_logout_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    actor: AuditActor,
    jar: CookieJar,
) -> AppResult<(CookieJar, ApiResponse<LogoutResponse>)> {
    let name = app_state.cookie_config.superadmin_cookie_name;
    logout(&app_state, &headers, &jar, &[name], actor).await;
    let jar = jar.add(expired_cookie(name, &app_state.cookie_config));
    Ok((
        jar,
        ApiResponse::success(LogoutResponse { logged_out: true }).with_message("Logged out"),
    ))
}

/// 現在のスーパー管理者セッション
pub async fn superadmin_session_handler(
    user: AuthenticatedUser,
) -> AppResult<ApiResponse<SessionInfoResponse>> {
    Ok(ApiResponse::success(SessionInfoResponse::from(&user.claims)))
}

// --- テナント利用者 ---

pub async fn tenant_login_handler(
    State(app_state): State<AppState>,
    actor: AuditActor,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<(CookieJar, ApiResponse<LoginResponse>)> {
    let response = app_state.auth_service.tenant_login(payload, actor).await?;

    let cookie = session_cookie(
        app_state.cookie_config.tenant_cookie_name,
        response.token.clone(),
        &app_state.cookie_config,
    );
    Ok((jar.add(cookie), ApiResponse::success(response)))
}

pub async fn tenant_logout_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    actor: AuditActor,
    jar: CookieJar,
) -> AppResult<(CookieJar, ApiResponse<LogoutResponse>)> {
    let name = app_state.cookie_config.tenant_cookie_name;
    logout(&app_state, &headers, &jar, &[name], actor).await;
    let jar = jar.add(expired_cookie(name, &app_state.cookie_config));
    Ok((
        jar,
        ApiResponse::success(LogoutResponse { logged_out: true }).with_message("Logged out"),
    ))
}

pub async fn me_handler(user: AuthenticatedUser) -> AppResult<ApiResponse<SessionInfoResponse>> {
    Ok(ApiResponse::success(SessionInfoResponse::from(&user.claims)))
}

async fn logout(
    app_state: &AppState,
    headers: &HeaderMap,
    jar: &CookieJar,
    cookie_names: &[&str],
    actor: AuditActor,
) {
    let claims = extract_token(headers, jar, cookie_names)
        .and_then(|token| app_state.jwt_manager.verify_session_token(&token).ok());

    match claims {
        Some(claims) => {
            let actor = AuditActor {
                user_id: Some(claims.sub),
                email: Some(claims.email.clone()),
                role: Some(claims.role.as_str().to_string()),
                ..actor
            };
            app_state.auth_service.logout(&claims, actor).await;
        }
        None => info!("Logout without a valid session"),
    }
}

// --- ルーター ---

/// ログイン（authポリシーでレート制限）
pub fn login_routes() -> Router<AppState> {
    Router::new()
        .route("/api/superadmin/login", post(superadmin_login_handler))
        .route("/api/auth/login", post(tenant_login_handler))
}

/// ログアウト（認証不要）
pub fn logout_routes() -> Router<AppState> {
    Router::new()
        .route("/api/superadmin/logout", post(superadmin_logout_handler))
        .route("/api/auth/logout", post(tenant_logout_handler))
}

pub fn superadmin_session_routes() -> Router<AppState> {
    Router::new().route("/api/superadmin/session", get(superadmin_session_handler))
}

pub fn tenant_session_routes() -> Router<AppState> {
    Router::new().route("/api/auth/me", get(me_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn test_session_cookie_attributes() {
        let config = CookieConfig::from_app_config(&AppConfig::for_testing(), 3600);
        let cookie = session_cookie("fixzit_session", "token".to_string(), &config);

        assert_eq!(cookie.value(), "token");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(3600)));
    }

    #[test]
    fn test_expired_cookie_clears_value() {
        let config = CookieConfig::from_app_config(&AppConfig::for_testing(), 3600);
        let cookie = expired_cookie("fixzit_session", &config);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    }
}
