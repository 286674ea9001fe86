// src/utils/jwt.rs

use crate::config::JwtConfig;
use crate::domain::role::RoleName;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// JWT関連のエラー
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Failed to encode JWT: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),

    #[error("Failed to decode JWT: {0}")]
    DecodingError(String),

    #[error("JWT token has expired")]
    TokenExpired,

    #[error("Invalid JWT token")]
    InvalidToken,

    #[error("Invalid JWT configuration: {0}")]
    ConfigurationError(String),
}

/// セッションの種別。スーパー管理者とテナント利用者でCookieを分ける
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    SuperAdmin,
    Tenant,
}

/// セッショントークンのClaims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
    pub nbf: i64,
    pub iss: String,
    pub aud: String,
    pub jti: String,
    pub kind: SessionKind,
    pub email: String,
    pub role: RoleName,
    pub org_id: Option<Uuid>,
}

impl SessionClaims {
    pub fn is_super_admin(&self) -> bool {
        self.role == RoleName::SuperAdmin
    }
}

/// ログイン時にトークンへ埋め込むユーザー情報
#[derive(Debug, Clone)]
pub struct SessionSubject {
    pub user_id: Uuid,
    pub email: String,
    pub role: RoleName,
    pub org_id: Option<Uuid>,
}

/// JWTトークン管理
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtManager {
    pub fn new(config: JwtConfig) -> Result<Self, JwtError> {
        if config.secret_key.len() < 32 {
            return Err(JwtError::ConfigurationError(
                "JWT secret key must be at least 32 characters".to_string(),
            ));
        }
        if config.access_token_expiry_minutes <= 0 {
            return Err(JwtError::ConfigurationError(
                "Access token expiry must be positive".to_string(),
            ));
        }

        let encoding_key = EncodingKey::from_secret(config.secret_key.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret_key.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        })
    }

    /// セッションの有効期間（秒）
    pub fn session_ttl_seconds(&self) -> i64 {
        self.config.access_token_expiry_minutes * 60
    }

    pub fn generate_session_token(
        &self,
        subject: &SessionSubject,
        kind: SessionKind,
    ) -> Result<(String, SessionClaims), JwtError> {
        let now = Utc::now();
        let exp = now + Duration::minutes(self.config.access_token_expiry_minutes);

        let claims = SessionClaims {
            sub: subject.user_id,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            nbf: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            jti: Uuid::new_v4().to_string(),
            kind,
            email: subject.email.clone(),
            role: subject.role,
            org_id: subject.org_id,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok((token, claims))
    }

    pub fn verify_session_token(&self, token: &str) -> Result<SessionClaims, JwtError> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken => JwtError::InvalidToken,
                _ => JwtError::DecodingError(e.to_string()),
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> JwtManager {
        JwtManager::new(JwtConfig {
            secret_key: "test-secret-key-that-is-at-least-32-characters-long".to_string(),
            access_token_expiry_minutes: 15,
            issuer: "fixzit".to_string(),
            audience: "fixzit-users".to_string(),
        })
        .unwrap()
    }

    fn subject(role: RoleName) -> SessionSubject {
        SessionSubject {
            user_id: Uuid::new_v4(),
            email: "ops@example.com".to_string(),
            role,
            org_id: None,
        }
    }

    #[test]
    fn test_generate_and_verify_session() {
        let jwt = manager();
        let subject = subject(RoleName::SuperAdmin);
        let (token, _) = jwt
            .generate_session_token(&subject, SessionKind::SuperAdmin)
            .unwrap();

        let claims = jwt.verify_session_token(&token).unwrap();
        assert_eq!(claims.sub, subject.user_id);
        assert_eq!(claims.kind, SessionKind::SuperAdmin);
        assert!(claims.is_super_admin());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let jwt = manager();
        let (token, _) = jwt
            .generate_session_token(&subject(RoleName::Viewer), SessionKind::Tenant)
            .unwrap();
        let tampered = format!("{}x", token);
        assert!(jwt.verify_session_token(&tampered).is_err());
        assert!(jwt.verify_session_token("not-a-token").is_err());
    }

    #[test]
    fn test_short_secret_is_rejected() {
        let result = JwtManager::new(JwtConfig {
            secret_key: "short".to_string(),
            access_token_expiry_minutes: 15,
            issuer: "fixzit".to_string(),
            audience: "fixzit-users".to_string(),
        });
        assert!(matches!(result, Err(JwtError::ConfigurationError(_))));
    }
}
