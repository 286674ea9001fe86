// src/extractors/audit_actor.rs
use crate::domain::audit_log_model::AuditActor;
use crate::middleware::auth::{extract_client_ip, AuthenticatedUser};
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use std::convert::Infallible;

/// 監査ログ用の操作者情報。未認証のリクエスト（ログイン等）ではIPとUAのみ
impl<S> FromRequestParts<S> for AuditActor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts.extensions.get::<AuthenticatedUser>();
        let user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(|ua| ua.chars().take(512).collect::<String>());

        Ok(AuditActor {
            user_id: user.map(|u| u.user_id()),
            email: user.map(|u| u.claims.email.clone()),
            role: user.map(|u| u.role().as_str().to_string()),
            ip_address: extract_client_ip(&parts.headers),
            user_agent,
        })
    }
}
