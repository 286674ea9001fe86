// src/config.rs
use dotenvy::dotenv;
use std::env;

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret_key: String,
    pub access_token_expiry_minutes: i64,
    pub issuer: String,
    pub audience: String,
}

/// レート制限のしきい値（ウィンドウ単位）
#[derive(Clone, Debug)]
pub struct RateLimitSettings {
    pub window_seconds: u64,
    pub auth_max_requests: u32,
    pub superadmin_max_requests: u32,
    pub api_max_requests: u32,
}

#[derive(Clone, Debug)]
pub struct PasswordHashConfig {
    /// メモリコスト（KB）
    pub memory_cost: u32,
    pub time_cost: u32,
    pub parallelism: u32,
}

#[derive(Clone, Debug)]
pub struct SecurityConfig {
    pub cookie_secure: bool,
    pub body_limit: usize,
    pub request_timeout_seconds: u64,
}

/// 起動時に作成するスーパー管理者
#[derive(Clone, Debug)]
pub struct SuperAdminBootstrap {
    pub email: String,
    pub password_hash: String,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub database_url: String,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitSettings,
    pub password_hash: PasswordHashConfig,
    pub security: SecurityConfig,
    pub superadmin: Option<SuperAdminBootstrap>,
    pub webhook_timeout_seconds: u64,
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, String> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| format!("Invalid {} value", name)),
        Err(_) => Ok(default),
    }
}

impl PasswordHashConfig {
    /// Argon2パラメータのみを読む（パスワードハッシュ生成ツールでも使用）
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            memory_cost: parse_var("ARGON2_MEMORY_COST", 65536)?,
            time_cost: parse_var("ARGON2_TIME_COST", 3)?,
            parallelism: parse_var("ARGON2_PARALLELISM", 4)?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok(); // .env ファイルは任意

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let is_production = environment == "production";

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| "JWT_SECRET must be set")?;
        if jwt_secret.len() < 32 {
            return Err("JWT_SECRET must be at least 32 characters".to_string());
        }

        // メールアドレスとハッシュの両方が揃った場合のみ初期スーパー管理者を作成
        let superadmin = match (
            env::var("SUPERADMIN_EMAIL"),
            env::var("SUPERADMIN_PASSWORD_HASH"),
        ) {
            (Ok(email), Ok(password_hash)) if !email.is_empty() && !password_hash.is_empty() => {
                Some(SuperAdminBootstrap {
                    email: email.trim().to_lowercase(),
                    password_hash,
                })
            }
            _ => None,
        };

        Ok(Self {
            environment,
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT", 5000)?,
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            database_url: env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            jwt: JwtConfig {
                secret_key: jwt_secret,
                access_token_expiry_minutes: parse_var("JWT_ACCESS_TOKEN_EXPIRY_MINUTES", 480)?,
                issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "fixzit".to_string()),
                audience: env::var("JWT_AUDIENCE").unwrap_or_else(|_| "fixzit-users".to_string()),
            },
            rate_limit: RateLimitSettings {
                window_seconds: parse_var("RATE_LIMIT_WINDOW_SECONDS", 60)?,
                auth_max_requests: parse_var("RATE_LIMIT_AUTH_MAX", 5)?,
                superadmin_max_requests: parse_var("RATE_LIMIT_SUPERADMIN_MAX", 120)?,
                api_max_requests: parse_var("RATE_LIMIT_API_MAX", 300)?,
            },
            password_hash: PasswordHashConfig::from_env()?,
            security: SecurityConfig {
                cookie_secure: is_production,
                body_limit: 2 * 1024 * 1024, // 2MB
                request_timeout_seconds: 30,
            },
            superadmin,
            webhook_timeout_seconds: parse_var("WEBHOOK_TIMEOUT_SECONDS", 10)?,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// テスト用の設定を作成
    pub fn for_testing() -> Self {
        Self {
            environment: "test".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_allowed_origins: vec!["http://localhost:3000".to_string()],
            database_url: "sqlite::memory:".to_string(),
            jwt: JwtConfig {
                secret_key: "test-secret-key-that-is-at-least-32-characters-long".to_string(),
                access_token_expiry_minutes: 60,
                issuer: "fixzit".to_string(),
                audience: "fixzit-users".to_string(),
            },
            rate_limit: RateLimitSettings {
                window_seconds: 60,
                auth_max_requests: 5,
                superadmin_max_requests: 1000,
                api_max_requests: 1000,
            },
            // テストでは高速なパラメータを使う
            password_hash: PasswordHashConfig {
                memory_cost: 4096,
                time_cost: 1,
                parallelism: 1,
            },
            security: SecurityConfig {
                cookie_secure: false,
                body_limit: 2 * 1024 * 1024,
                request_timeout_seconds: 30,
            },
            superadmin: None,
            webhook_timeout_seconds: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_testing_uses_sqlite_memory() {
        let config = AppConfig::for_testing();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert!(!config.is_production());
        assert!(config.jwt.secret_key.len() >= 32);
        assert_eq!(config.bind_address(), "127.0.0.1:0");
    }
}
