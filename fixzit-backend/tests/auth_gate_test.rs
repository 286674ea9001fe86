// tests/auth_gate_test.rs
mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::app_helper::{
    setup_app, setup_app_with_config, SUPERADMIN_EMAIL, SUPERADMIN_PASSWORD,
};
use common::request::{
    create_get_request, create_public_request, create_raw_request, create_request, response_json,
};
use fixzit_backend::config::AppConfig;
use serde_json::json;

#[tokio::test]
async fn test_superadmin_route_without_token_is_unauthorized() {
    // Arrange
    let app = setup_app().await;

    // Act
    let response = app
        .send(
            Request::builder()
                .uri("/api/superadmin/organizations")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    // Assert
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error_type"], "unauthorized");
}

#[tokio::test]
async fn test_tenant_route_with_garbage_token_is_unauthorized() {
    let app = setup_app().await;

    let response = app
        .send(create_get_request("/api/fm/vendors", "not-a-jwt"))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_superadmin_login_sets_http_only_cookie() {
    let app = setup_app().await;

    let response = app
        .login("/api/superadmin/login", SUPERADMIN_EMAIL, SUPERADMIN_PASSWORD)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("fixzit_superadmin_session="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Strict"));

    let body = response_json(response).await;
    assert_eq!(body["data"]["user"]["role"], "SUPER_ADMIN");
    assert_eq!(body["data"]["token_type"], "Bearer");
}

#[tokio::test]
async fn test_session_cookie_is_accepted_on_superadmin_routes() {
    let app = setup_app().await;
    let token = app.login_superadmin().await;

    // Bearerではなく Cookie で認証する
    let response = app
        .send(
            Request::builder()
                .uri("/api/superadmin/session")
                .header(
                    header::COOKIE,
                    format!("fixzit_superadmin_session={}", token),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["email"], SUPERADMIN_EMAIL);
    assert_eq!(body["data"]["kind"], "super_admin");
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized_and_audited() {
    let app = setup_app().await;

    let response = app
        .login("/api/superadmin/login", SUPERADMIN_EMAIL, "Wrong!Passw0rd#1")
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = app.login_superadmin().await;
    let response = app
        .send(create_get_request(
            "/api/superadmin/audit-logs?action=login_failed",
            &token,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["pagination"]["total_count"], 1);
    assert_eq!(body["data"]["items"][0]["result"], "failure");
}

#[tokio::test]
async fn test_login_rate_limit_returns_retry_after() {
    // Arrange: 認証ポリシーは 5回/60秒
    let app = setup_app_with_config(AppConfig::for_testing()).await;

    // Act
    for _ in 0..5 {
        let response = app
            .login("/api/superadmin/login", SUPERADMIN_EMAIL, "Wrong!Passw0rd#1")
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get("x-ratelimit-remaining").is_some());
    }
    let response = app
        .login("/api/superadmin/login", SUPERADMIN_EMAIL, SUPERADMIN_PASSWORD)
        .await;

    // Assert: 正しい資格情報でも上限超過なら 429
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = response
        .headers()
        .get(header::RETRY_AFTER)
        .unwrap()
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!((1..=60).contains(&retry_after));
    let body = response_json(response).await;
    assert_eq!(body["error_type"], "rate_limited");
}

#[tokio::test]
async fn test_rate_limit_is_tracked_per_client_ip() {
    let app = setup_app_with_config(AppConfig::for_testing()).await;

    for _ in 0..5 {
        app.login("/api/superadmin/login", SUPERADMIN_EMAIL, "Wrong!Passw0rd#1")
            .await;
    }

    // 別のクライアントIPは影響を受けない
    let response = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/api/superadmin/login")
                .header(header::CONTENT_TYPE, "application/json")
                .header("x-forwarded-for", "203.0.113.7")
                .body(Body::from(
                    json!({ "email": SUPERADMIN_EMAIL, "password": SUPERADMIN_PASSWORD })
                        .to_string(),
                ))
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_tenant_token_is_forbidden_on_superadmin_routes() {
    let app = setup_app().await;
    let admin_token = app.login_superadmin().await;
    let (_, tenant_token) = app.tenant_session(&admin_token, "acme", "ADMIN").await;

    let response = app
        .send(create_get_request("/api/superadmin/organizations", &tenant_token))
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_tenant_cannot_use_superadmin_login() {
    let app = setup_app().await;
    let admin_token = app.login_superadmin().await;
    let org_id = app.create_organization(&admin_token, "acme").await;
    app.create_tenant_user(&admin_token, org_id, "admin@acme.test", "ADMIN")
        .await;

    let response = app
        .login(
            "/api/superadmin/login",
            "admin@acme.test",
            common::app_helper::TENANT_PASSWORD,
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = setup_app().await;
    let token = app.login_superadmin().await;

    let response = app
        .send(create_raw_request(
            "POST",
            "/api/superadmin/organizations",
            &token,
            "{\"name\": ",
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error_type"], "bad_request");
}

#[tokio::test]
async fn test_validation_failure_lists_fields() {
    let app = setup_app().await;
    let token = app.login_superadmin().await;

    let response = app
        .send(create_request(
            "POST",
            "/api/superadmin/organizations",
            &token,
            &json!({ "name": "", "code": "Not A Slug" }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error_type"], "validation_errors");
    assert!(body["validation_errors"]["name"].is_array());
    assert!(body["validation_errors"]["code"].is_array());
}

#[tokio::test]
async fn test_invalid_path_uuid_is_bad_request() {
    let app = setup_app().await;
    let token = app.login_superadmin().await;

    let response = app
        .send(create_get_request(
            "/api/superadmin/organizations/not-a-uuid",
            &token,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_me_reports_tenant_session() {
    let app = setup_app().await;
    let admin_token = app.login_superadmin().await;
    let (org_id, tenant_token) = app.tenant_session(&admin_token, "acme", "FM_MANAGER").await;

    let response = app
        .send(create_get_request("/api/auth/me", &tenant_token))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["role"], "FM_MANAGER");
    assert_eq!(body["data"]["org_id"], org_id.to_string());
    assert_eq!(body["data"]["kind"], "tenant");
}

#[tokio::test]
async fn test_logout_expires_cookie() {
    let app = setup_app().await;
    let token = app.login_superadmin().await;

    let response = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/api/superadmin/logout")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("fixzit_superadmin_session=;"));
    assert!(set_cookie.contains("Max-Age=0"));
    let body = response_json(response).await;
    assert_eq!(body["data"]["logged_out"], true);
    assert_eq!(body["message"], "Logged out");
}

#[tokio::test]
async fn test_suspended_user_is_rejected() {
    let app = setup_app().await;
    let admin_token = app.login_superadmin().await;
    let org_id = app.create_organization(&admin_token, "acme").await;
    let user_id = app
        .create_tenant_user(&admin_token, org_id, "tech@acme.test", "TECHNICIAN")
        .await;
    let tenant_token = app.login_tenant("tech@acme.test").await;

    let response = app
        .send(create_request(
            "PATCH",
            &format!("/api/superadmin/users/{}", user_id),
            &admin_token,
            &json!({ "status": "suspended" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // 発行済みトークンでもDB上の状態で拒否される
    let response = app
        .send(create_get_request("/api/fm/work-orders", &tenant_token))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_health_and_security_headers() {
    let app = setup_app().await;

    let response = app
        .send(create_public_request("GET", "/health", &json!({})))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert!(response.headers().get("x-request-id").is_some());
    let body = response_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "up");
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let app = setup_app().await;

    let response = app
        .send(
            Request::builder()
                .uri("/api/does-not-exist")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_email_is_indistinguishable_from_wrong_password() {
    let app = setup_app().await;

    let unknown = app
        .login("/api/auth/login", "nobody@fixzit.test", "Wrong!Passw0rd#1")
        .await;
    let wrong = app
        .login("/api/superadmin/login", SUPERADMIN_EMAIL, "Wrong!Passw0rd#1")
        .await;

    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    let unknown = response_json(unknown).await;
    let wrong = response_json(wrong).await;
    assert_eq!(unknown["message"], wrong["message"]);
    assert_eq!(unknown["error_type"], wrong["error_type"]);
}
