// tests/common/app_helper.rs
use super::init_test_env;
use super::request::{create_public_request, create_request, response_json};
use axum::{body::Body, http::Request, http::StatusCode, response::Response, Router};
use fixzit_backend::api::{create_app, AppState};
use fixzit_backend::config::{AppConfig, SuperAdminBootstrap};
use fixzit_backend::db::connect_with_options;
use fixzit_backend::utils::password::{PasswordManager, PasswordPolicy};
use migration::{Migrator, MigratorTrait};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

pub const SUPERADMIN_EMAIL: &str = "root@fixzit.test";
pub const SUPERADMIN_PASSWORD: &str = "Root!Passw0rd#2026";
pub const TENANT_PASSWORD: &str = "Tenant!Passw0rd#1";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

/// ログイン回数の上限を緩めた標準のテストアプリ
pub async fn setup_app() -> TestApp {
    let mut config = AppConfig::for_testing();
    config.rate_limit.auth_max_requests = 100;
    setup_app_with_config(config).await
}

/// インメモリSQLite + マイグレーション + スーパー管理者のシード
pub async fn setup_app_with_config(mut config: AppConfig) -> TestApp {
    init_test_env();

    let password_manager =
        PasswordManager::new(&config.password_hash, PasswordPolicy::default()).unwrap();
    config.superadmin = Some(SuperAdminBootstrap {
        email: SUPERADMIN_EMAIL.to_string(),
        password_hash: password_manager.hash_unchecked(SUPERADMIN_PASSWORD).unwrap(),
    });

    let db = connect_with_options(&config.database_url, 1).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let state = AppState::build(db, &config).unwrap();
    state
        .bootstrap_service
        .run(config.superadmin.as_ref())
        .await
        .unwrap();

    let router = create_app(state.clone());
    TestApp { router, state }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn login(&self, uri: &str, email: &str, password: &str) -> Response {
        self.send(create_public_request(
            "POST",
            uri,
            &json!({ "email": email, "password": password }),
        ))
        .await
    }

    pub async fn login_superadmin(&self) -> String {
        let response = self
            .login("/api/superadmin/login", SUPERADMIN_EMAIL, SUPERADMIN_PASSWORD)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        body["data"]["token"].as_str().unwrap().to_string()
    }

    pub async fn login_tenant(&self, email: &str) -> String {
        let response = self.login("/api/auth/login", email, TENANT_PASSWORD).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        body["data"]["token"].as_str().unwrap().to_string()
    }

    pub async fn create_organization(&self, admin_token: &str, code: &str) -> Uuid {
        let response = self
            .send(create_request(
                "POST",
                "/api/superadmin/organizations",
                admin_token,
                &json!({ "name": format!("Org {}", code), "code": code }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response_json(response).await;
        body["data"]["id"].as_str().unwrap().parse().unwrap()
    }

    pub async fn create_tenant_user(
        &self,
        admin_token: &str,
        org_id: Uuid,
        email: &str,
        role: &str,
    ) -> Uuid {
        let response = self
            .send(create_request(
                "POST",
                "/api/superadmin/users",
                admin_token,
                &json!({
                    "email": email,
                    "full_name": format!("User {}", role),
                    "password": TENANT_PASSWORD,
                    "role": role,
                    "org_id": org_id,
                }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response_json(response).await;
        body["data"]["id"].as_str().unwrap().parse().unwrap()
    }

    /// 組織とユーザーを作ってテナントとしてログインする
    pub async fn tenant_session(&self, admin_token: &str, code: &str, role: &str) -> (Uuid, String) {
        let org_id = self.create_organization(admin_token, code).await;
        let email = format!("{}@{}.test", role.to_lowercase(), code);
        self.create_tenant_user(admin_token, org_id, &email, role)
            .await;
        let token = self.login_tenant(&email).await;
        (org_id, token)
    }
}
