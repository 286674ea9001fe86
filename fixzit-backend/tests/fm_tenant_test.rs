// tests/fm_tenant_test.rs
mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::app_helper::{setup_app, TestApp};
use common::request::{
    create_empty_request, create_get_request, create_org_scoped_get, create_request,
    response_json,
};
use serde_json::json;
use uuid::Uuid;

async fn create_vendor(app: &TestApp, token: &str, name: &str) -> String {
    let response = app
        .send(create_request(
            "POST",
            "/api/fm/vendors",
            token,
            &json!({ "name": name, "specialization": "hvac", "rating": 4.5 }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_vendor_crud_within_organization() {
    // Arrange
    let app = setup_app().await;
    let admin_token = app.login_superadmin().await;
    let (org_id, token) = app.tenant_session(&admin_token, "acme", "FM_MANAGER").await;

    // Act
    let vendor_id = create_vendor(&app, &token, "Cool Air LLC").await;
    let updated = app
        .send(create_request(
            "PATCH",
            &format!("/api/fm/vendors/{}", vendor_id),
            &token,
            &json!({ "rating": 3.0 }),
        ))
        .await;
    let listed = app.send(create_get_request("/api/fm/vendors", &token)).await;

    // Assert
    assert_eq!(updated.status(), StatusCode::OK);
    let body = response_json(updated).await;
    assert_eq!(body["data"]["rating"], 3.0);
    assert_eq!(body["data"]["org_id"], org_id.to_string());

    assert_eq!(listed.status(), StatusCode::OK);
    let body = response_json(listed).await;
    assert_eq!(body["data"]["pagination"]["total_count"], 1);

    let deleted = app
        .send(create_empty_request(
            "DELETE",
            &format!("/api/fm/vendors/{}", vendor_id),
            &token,
        ))
        .await;
    assert_eq!(deleted.status(), StatusCode::OK);
    let body = response_json(deleted).await;
    assert_eq!(body["data"]["deleted"], true);
}

#[tokio::test]
async fn test_vendor_validation_rejects_out_of_range_rating() {
    let app = setup_app().await;
    let admin_token = app.login_superadmin().await;
    let (_, token) = app.tenant_session(&admin_token, "acme", "FM_MANAGER").await;

    let response = app
        .send(create_request(
            "POST",
            "/api/fm/vendors",
            &token,
            &json!({ "name": "Too good", "rating": 7.5 }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_viewer_can_list_but_not_create_vendors() {
    let app = setup_app().await;
    let admin_token = app.login_superadmin().await;
    let (_, token) = app.tenant_session(&admin_token, "acme", "VIEWER").await;

    let listed = app.send(create_get_request("/api/fm/vendors", &token)).await;
    assert_eq!(listed.status(), StatusCode::OK);

    let response = app
        .send(create_request(
            "POST",
            "/api/fm/vendors",
            &token,
            &json!({ "name": "Sneaky vendor" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = response_json(response).await;
    assert_eq!(body["error_type"], "forbidden");
}

#[tokio::test]
async fn test_permission_check_runs_before_body_validation() {
    let app = setup_app().await;
    let admin_token = app.login_superadmin().await;
    let (_, token) = app.tenant_session(&admin_token, "acme", "VIEWER").await;

    // 不正なボディでも権限がなければ 403
    let response = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/api/fm/vendors")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::from("{oops"))
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_custom_role_grants_extra_capabilities() {
    let app = setup_app().await;
    let admin_token = app.login_superadmin().await;
    let org_id = app.create_organization(&admin_token, "acme").await;

    let role = app
        .send(create_request(
            "POST",
            "/api/superadmin/roles",
            &admin_token,
            &json!({ "name": "vendor_onboarding", "permissions": ["VENDOR:CREATE"] }),
        ))
        .await;
    assert_eq!(role.status(), StatusCode::CREATED);
    let role_id = response_json(role).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .send(create_request(
            "POST",
            "/api/superadmin/users",
            &admin_token,
            &json!({
                "email": "onboarding@acme.test",
                "full_name": "Onboarding",
                "password": common::app_helper::TENANT_PASSWORD,
                "role": "VIEWER",
                "org_id": org_id,
                "custom_role_id": role_id,
            }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let token = app.login_tenant("onboarding@acme.test").await;

    create_vendor(&app, &token, "Onboarded vendor").await;
}

#[tokio::test]
async fn test_cross_tenant_vendor_is_not_found() {
    // Arrange: 2つの組織
    let app = setup_app().await;
    let admin_token = app.login_superadmin().await;
    let (_, token_a) = app.tenant_session(&admin_token, "acme", "FM_MANAGER").await;
    let (_, token_b) = app.tenant_session(&admin_token, "globex", "FM_MANAGER").await;
    let vendor_id = create_vendor(&app, &token_a, "Acme only").await;

    // Act
    let fetched = app
        .send(create_get_request(
            &format!("/api/fm/vendors/{}", vendor_id),
            &token_b,
        ))
        .await;
    let deleted = app
        .send(create_empty_request(
            "DELETE",
            &format!("/api/fm/vendors/{}", vendor_id),
            &token_b,
        ))
        .await;

    // Assert: 存在を漏らさず 404
    assert_eq!(fetched.status(), StatusCode::NOT_FOUND);
    assert_eq!(deleted.status(), StatusCode::NOT_FOUND);

    // テナントが X-Org-Id を付けても自組織のデータしか見えない
    let listed = app
        .send(create_org_scoped_get(
            "/api/fm/vendors",
            &token_b,
            &Uuid::new_v4().to_string(),
        ))
        .await;
    assert_eq!(listed.status(), StatusCode::OK);
    let body = response_json(listed).await;
    assert_eq!(body["data"]["pagination"]["total_count"], 0);
}

#[tokio::test]
async fn test_superadmin_must_choose_organization() {
    let app = setup_app().await;
    let admin_token = app.login_superadmin().await;
    let (org_id, token) = app.tenant_session(&admin_token, "acme", "FM_MANAGER").await;
    create_vendor(&app, &token, "Acme vendor").await;

    let without_header = app
        .send(create_get_request("/api/fm/vendors", &admin_token))
        .await;
    assert_eq!(without_header.status(), StatusCode::BAD_REQUEST);

    let invalid_header = app
        .send(create_org_scoped_get("/api/fm/vendors", &admin_token, "acme"))
        .await;
    assert_eq!(invalid_header.status(), StatusCode::BAD_REQUEST);

    let unknown_org = app
        .send(create_org_scoped_get(
            "/api/fm/vendors",
            &admin_token,
            &Uuid::new_v4().to_string(),
        ))
        .await;
    assert_eq!(unknown_org.status(), StatusCode::NOT_FOUND);

    let scoped = app
        .send(create_org_scoped_get(
            "/api/fm/vendors",
            &admin_token,
            &org_id.to_string(),
        ))
        .await;
    assert_eq!(scoped.status(), StatusCode::OK);
    let body = response_json(scoped).await;
    assert_eq!(body["data"]["pagination"]["total_count"], 1);
}

#[tokio::test]
async fn test_suspended_organization_blocks_tenant_access() {
    let app = setup_app().await;
    let admin_token = app.login_superadmin().await;
    let (org_id, token) = app.tenant_session(&admin_token, "acme", "FM_MANAGER").await;

    let response = app
        .send(create_request(
            "PATCH",
            &format!("/api/superadmin/organizations/{}", org_id),
            &admin_token,
            &json!({ "status": "suspended" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.send(create_get_request("/api/fm/vendors", &token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let login = app
        .login(
            "/api/auth/login",
            "fm_manager@acme.test",
            common::app_helper::TENANT_PASSWORD,
        )
        .await;
    assert_eq!(login.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_work_order_status_transitions() {
    // Arrange
    let app = setup_app().await;
    let admin_token = app.login_superadmin().await;
    let (_, token) = app.tenant_session(&admin_token, "acme", "FM_MANAGER").await;
    let vendor_id = create_vendor(&app, &token, "Fixers").await;

    let created = app
        .send(create_request(
            "POST",
            "/api/fm/work-orders",
            &token,
            &json!({ "title": "Leaking pipe", "category": "plumbing" }),
        ))
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let body = response_json(created).await;
    assert_eq!(body["data"]["status"], "open");
    assert_eq!(body["data"]["priority"], "medium");
    let order_id = body["data"]["id"].as_str().unwrap().to_string();
    let status_uri = format!("/api/fm/work-orders/{}/status", order_id);

    // Act & Assert: ベンダー未指定での割り当ては不可
    let response = app
        .send(create_request(
            "PATCH",
            &status_uri,
            &token,
            &json!({ "status": "assigned" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // open から closed へは直接遷移できない
    let response = app
        .send(create_request(
            "PATCH",
            &status_uri,
            &token,
            &json!({ "status": "closed" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .send(create_request(
            "PATCH",
            &status_uri,
            &token,
            &json!({ "status": "assigned", "vendor_id": vendor_id }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "assigned");
    assert_eq!(body["data"]["vendor_id"], vendor_id);

    let fetched = app
        .send(create_get_request(
            &format!("/api/fm/work-orders/{}", order_id),
            &token,
        ))
        .await;
    assert_eq!(fetched.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_work_order_rejects_vendor_from_other_organization() {
    let app = setup_app().await;
    let admin_token = app.login_superadmin().await;
    let (_, token_a) = app.tenant_session(&admin_token, "acme", "FM_MANAGER").await;
    let (_, token_b) = app.tenant_session(&admin_token, "globex", "FM_MANAGER").await;
    let foreign_vendor = create_vendor(&app, &token_a, "Acme vendor").await;

    let response = app
        .send(create_request(
            "POST",
            "/api/fm/work-orders",
            &token_b,
            &json!({ "title": "Broken door", "vendor_id": foreign_vendor }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_tenant_role_can_create_but_not_update_work_orders() {
    let app = setup_app().await;
    let admin_token = app.login_superadmin().await;
    let (_, token) = app.tenant_session(&admin_token, "acme", "TENANT").await;

    let created = app
        .send(create_request(
            "POST",
            "/api/fm/work-orders",
            &token,
            &json!({ "title": "No hot water", "priority": "high" }),
        ))
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let order_id = response_json(created).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .send(create_request(
            "PATCH",
            &format!("/api/fm/work-orders/{}/status", order_id),
            &token,
            &json!({ "status": "cancelled" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_feature_flag_evaluation_for_tenant() {
    let app = setup_app().await;
    let admin_token = app.login_superadmin().await;
    let (org_a, token_a) = app.tenant_session(&admin_token, "acme", "VIEWER").await;
    let (_, token_b) = app.tenant_session(&admin_token, "globex", "VIEWER").await;

    let created = app
        .send(create_request(
            "POST",
            "/api/superadmin/feature-flags",
            &admin_token,
            &json!({
                "key": "new_dashboard",
                "name": "New dashboard",
                "enabled": true,
                "rollout_percentage": 0,
                "target_org_ids": [org_a],
            }),
        ))
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let response = app
        .send(create_get_request("/api/fm/feature-flags/new_dashboard", &token_a))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["data"]["enabled"], true);

    let response = app
        .send(create_get_request("/api/fm/feature-flags/new_dashboard", &token_b))
        .await;
    assert_eq!(response_json(response).await["data"]["enabled"], false);

    // 未定義のフラグは無効扱い
    let response = app
        .send(create_get_request("/api/fm/feature-flags/unknown_flag", &token_a))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["data"]["enabled"], false);
}

#[tokio::test]
async fn test_notifications_reach_targeted_tenant_only() {
    let app = setup_app().await;
    let admin_token = app.login_superadmin().await;
    let (org_a, token_a) = app.tenant_session(&admin_token, "acme", "VIEWER").await;
    let (_, token_b) = app.tenant_session(&admin_token, "globex", "VIEWER").await;

    let response = app
        .send(create_request(
            "POST",
            "/api/superadmin/notifications",
            &admin_token,
            &json!({
                "title": "Maintenance window",
                "message": "The platform will be read-only on Friday night.",
                "org_ids": [org_a],
            }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response_json(response).await["data"]["created"], 1);

    let feed_a = app
        .send(create_get_request("/api/fm/notifications", &token_a))
        .await;
    assert_eq!(feed_a.status(), StatusCode::OK);
    let body = response_json(feed_a).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["title"], "Maintenance window");

    let feed_b = app
        .send(create_get_request("/api/fm/notifications", &token_b))
        .await;
    let body = response_json(feed_b).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_notification_role_targeting() {
    let app = setup_app().await;
    let admin_token = app.login_superadmin().await;
    let (org_id, viewer_token) = app.tenant_session(&admin_token, "acme", "VIEWER").await;
    app.create_tenant_user(&admin_token, org_id, "finance@acme.test", "FINANCE")
        .await;
    let finance_token = app.login_tenant("finance@acme.test").await;

    let response = app
        .send(create_request(
            "POST",
            "/api/superadmin/notifications",
            &admin_token,
            &json!({
                "title": "Invoice run",
                "message": "Monthly invoices are ready.",
                "org_ids": [org_id],
                "target_roles": ["FINANCE"],
            }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let finance_feed = response_json(
        app.send(create_get_request("/api/fm/notifications", &finance_token))
            .await,
    )
    .await;
    assert_eq!(finance_feed["data"].as_array().unwrap().len(), 1);

    let viewer_feed = response_json(
        app.send(create_get_request("/api/fm/notifications", &viewer_token))
            .await,
    )
    .await;
    assert!(viewer_feed["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_role_targeted_notification_survives_newer_traffic_for_other_roles() {
    let app = setup_app().await;
    let admin_token = app.login_superadmin().await;
    let (org_id, viewer_token) = app.tenant_session(&admin_token, "acme", "VIEWER").await;

    let broadcast = |title: String, role: &'static str| {
        create_request(
            "POST",
            "/api/superadmin/notifications",
            &admin_token,
            &json!({
                "title": title,
                "message": "Scheduled maintenance window.",
                "org_ids": [org_id],
                "target_roles": [role],
            }),
        )
    };

    let response = app.send(broadcast("For viewers".to_string(), "VIEWER")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // 1ページ目を他ロール宛だけで埋める
    for i in 0..210 {
        let response = app.send(broadcast(format!("Finance #{}", i), "FINANCE")).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let viewer_feed = response_json(
        app.send(create_get_request("/api/fm/notifications", &viewer_token))
            .await,
    )
    .await;
    let items = viewer_feed["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "For viewers");
}
