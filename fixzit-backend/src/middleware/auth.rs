// src/middleware/auth.rs

use crate::domain::capability::Capability;
use crate::domain::permission::is_allowed;
use crate::domain::role::RoleName;
use crate::error::AppError;
use crate::repository::role_repository::RoleRepository;
use crate::repository::user_repository::UserRepository;
use crate::utils::error_helper::{forbidden_error, internal_server_error, unauthorized_error};
use crate::utils::jwt::{JwtManager, SessionClaims, SessionKind};
use crate::config::AppConfig;
use crate::extractors::tenant::ORG_ID_HEADER;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, HeaderName, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{debug, warn};
use uuid::Uuid;

pub const SUPERADMIN_SESSION_COOKIE: &str = "fixzit_superadmin_session";
pub const TENANT_SESSION_COOKIE: &str = "fixzit_session";

/// 認証ミドルウェアの依存
#[derive(Clone)]
pub struct AuthMiddlewareConfig {
    pub jwt_manager: Arc<JwtManager>,
    pub user_repository: Arc<UserRepository>,
    pub role_repository: Arc<RoleRepository>,
}

/// 認証済みユーザー（リクエスト拡張に格納）
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub claims: SessionClaims,
    /// カスタムロールで付与された権限
    pub extra_capabilities: Vec<Capability>,
}

impl AuthenticatedUser {
    pub fn user_id(&self) -> Uuid {
        self.claims.sub
    }

    pub fn role(&self) -> RoleName {
        self.claims.role
    }

    pub fn org_id(&self) -> Option<Uuid> {
        self.claims.org_id
    }

    pub fn is_super_admin(&self) -> bool {
        self.claims.is_super_admin()
    }

    pub fn can(&self, capability: Capability) -> bool {
        is_allowed(self.claims.role, &self.extra_capabilities, capability)
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

/// スーパー管理者セッション専用の認証
///
/// トークンなし・不正は401、スーパー管理者以外のセッションは403。
pub async fn superadmin_auth_middleware(
    State(config): State<AuthMiddlewareConfig>,
    cookie_jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    let token = extract_token(request.headers(), &cookie_jar, &[SUPERADMIN_SESSION_COOKIE])
        .ok_or_else(|| {
            unauthorized_error(
                &format!("missing token for {}", path),
                "auth::superadmin_auth_middleware",
                "Authentication required",
            )
        })?;

    let claims = config.jwt_manager.verify_session_token(&token).map_err(|e| {
        unauthorized_error(
            &e.to_string(),
            "auth::superadmin_auth_middleware",
            "Invalid or expired session",
        )
    })?;

    if claims.kind != SessionKind::SuperAdmin || !claims.is_super_admin() {
        return Err(forbidden_error(
            "Superadmin access required",
            "auth::superadmin_auth_middleware",
            Some(&claims.sub.to_string()),
        ));
    }

    // トークン発行後の停止・降格を反映する
    let user = config
        .user_repository
        .find_by_id(claims.sub)
        .await
        .map_err(|e| {
            internal_server_error(e, "auth::superadmin_auth_middleware", "Failed to load session")
        })?
        .ok_or_else(|| {
            unauthorized_error(
                "session user no longer exists",
                "auth::superadmin_auth_middleware",
                "Invalid or expired session",
            )
        })?;
    if !user.is_super_admin() {
        return Err(forbidden_error(
            "Superadmin access required",
            "auth::superadmin_auth_middleware",
            Some(&user.id.to_string()),
        ));
    }
    if !user.is_active() {
        return Err(forbidden_error(
            &format!("Account is {}", user.status),
            "auth::superadmin_auth_middleware",
            Some(&user.id.to_string()),
        ));
    }

    debug!(user_id = %claims.sub, path = %path, "Superadmin authenticated");
    request.extensions_mut().insert(AuthenticatedUser {
        claims,
        extra_capabilities: Vec::new(),
    });

    Ok(next.run(request).await)
}

/// テナント利用者（およびテナントを代行するスーパー管理者）の認証
pub async fn tenant_auth_middleware(
    State(config): State<AuthMiddlewareConfig>,
    cookie_jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    let token = extract_token(
        request.headers(),
        &cookie_jar,
        &[TENANT_SESSION_COOKIE, SUPERADMIN_SESSION_COOKIE],
    )
    .ok_or_else(|| {
        unauthorized_error(
            &format!("missing token for {}", path),
            "auth::tenant_auth_middleware",
            "Authentication required",
        )
    })?;

    let mut claims = config.jwt_manager.verify_session_token(&token).map_err(|e| {
        unauthorized_error(
            &e.to_string(),
            "auth::tenant_auth_middleware",
            "Invalid or expired session",
        )
    })?;

    let user = config
        .user_repository
        .find_by_id(claims.sub)
        .await
        .map_err(|e| internal_server_error(e, "auth::tenant_auth_middleware", "Failed to load session"))?
        .ok_or_else(|| {
            unauthorized_error(
                "session user no longer exists",
                "auth::tenant_auth_middleware",
                "Invalid or expired session",
            )
        })?;
    if !user.is_active() {
        return Err(forbidden_error(
            &format!("Account is {}", user.status),
            "auth::tenant_auth_middleware",
            Some(&user.id.to_string()),
        ));
    }

    // ロール・所属はDBの現在値を優先
    claims.role = user.role_name();
    claims.org_id = user.org_id;

    let extra_capabilities = match user.custom_role_id {
        Some(role_id) => config
            .role_repository
            .find_by_id(role_id)
            .await
            .map_err(|e| {
                internal_server_error(e, "auth::tenant_auth_middleware", "Failed to load session")
            })?
            .map(|role| role.capabilities())
            .unwrap_or_default(),
        None => Vec::new(),
    };

    debug!(
        user_id = %claims.sub,
        role = %claims.role,
        path = %path,
        "Tenant user authenticated"
    );
    request.extensions_mut().insert(AuthenticatedUser {
        claims,
        extra_capabilities,
    });

    Ok(next.run(request).await)
}

/// Authorization: Bearer を優先し、なければ指定順にCookieを探す
pub fn extract_token(
    headers: &HeaderMap,
    cookie_jar: &CookieJar,
    cookie_names: &[&str],
) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());

    bearer.or_else(|| {
        cookie_names
            .iter()
            .find_map(|name| cookie_jar.get(name))
            .map(|cookie| cookie.value().to_string())
            .filter(|token| !token.is_empty())
    })
}

/// X-Forwarded-For の先頭、なければ X-Real-IP
pub fn extract_client_ip(headers: &HeaderMap) -> Option<String> {
    if let Some(forwarded_str) = headers
        .get("X-Forwarded-For")
        .and_then(|value| value.to_str().ok())
    {
        if let Some(ip) = forwarded_str
            .split(',')
            .next()
            .map(|ip| ip.trim())
            .filter(|ip| !ip.is_empty())
        {
            return Some(ip.to_string());
        }
    }

    headers
        .get("X-Real-IP")
        .and_then(|value| value.to_str().ok())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
}

/// セキュリティヘッダーミドルウェア
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        "Content-Security-Policy",
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none';"),
    );
    headers.insert(
        "Permissions-Policy",
        HeaderValue::from_static("camera=(), microphone=(), geolocation=()"),
    );

    response
}

/// 設定から許可オリジンを組み立てる。不正なオリジンは警告して無視する
pub fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(ORG_ID_HEADER),
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_extra::extract::cookie::Cookie;

    #[test]
    fn test_extract_token_prefers_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        let jar = CookieJar::new().add(Cookie::new(TENANT_SESSION_COOKIE, "cookie-token"));

        assert_eq!(
            extract_token(&headers, &jar, &[TENANT_SESSION_COOKIE]).as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn test_extract_token_falls_back_to_cookie_order() {
        let headers = HeaderMap::new();
        let jar = CookieJar::new().add(Cookie::new(SUPERADMIN_SESSION_COOKIE, "admin-token"));

        assert_eq!(
            extract_token(
                &headers,
                &jar,
                &[TENANT_SESSION_COOKIE, SUPERADMIN_SESSION_COOKIE]
            )
            .as_deref(),
            Some("admin-token")
        );
        assert!(extract_token(&headers, &jar, &[TENANT_SESSION_COOKIE]).is_none());
    }

    #[test]
    fn test_extract_client_ip() {
        let mut headers = HeaderMap::new();
        assert!(extract_client_ip(&headers).is_none());

        headers.insert("X-Real-IP", HeaderValue::from_static("192.0.2.9"));
        assert_eq!(extract_client_ip(&headers).as_deref(), Some("192.0.2.9"));

        headers.insert(
            "X-Forwarded-For",
            HeaderValue::from_static("203.0.113.5, 10.0.0.1"),
        );
        assert_eq!(extract_client_ip(&headers).as_deref(), Some("203.0.113.5"));
    }
}
