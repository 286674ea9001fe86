// tests/superadmin_api_test.rs
mod common;

use axum::http::StatusCode;
use common::app_helper::setup_app;
use common::request::{
    create_empty_request, create_get_request, create_public_request, create_request,
    response_json,
};
use chrono::Utc;
use fixzit_backend::domain::role_model;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_organization_lifecycle() {
    // Arrange
    let app = setup_app().await;
    let token = app.login_superadmin().await;

    // Act
    let org_id = app.create_organization(&token, "acme").await;
    let duplicate = app
        .send(create_request(
            "POST",
            "/api/superadmin/organizations",
            &token,
            &json!({ "name": "Acme again", "code": "acme" }),
        ))
        .await;
    let updated = app
        .send(create_request(
            "PATCH",
            &format!("/api/superadmin/organizations/{}", org_id),
            &token,
            &json!({ "status": "suspended", "country": "SA" }),
        ))
        .await;

    // Assert
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
    assert_eq!(updated.status(), StatusCode::OK);
    let body = response_json(updated).await;
    assert_eq!(body["data"]["status"], "suspended");
    assert_eq!(body["data"]["country"], "SA");

    let missing = app
        .send(create_get_request(
            &format!("/api/superadmin/organizations/{}", Uuid::new_v4()),
            &token,
        ))
        .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_patch_is_bad_request() {
    let app = setup_app().await;
    let token = app.login_superadmin().await;
    let org_id = app.create_organization(&token, "acme").await;

    let response = app
        .send(create_request(
            "PATCH",
            &format!("/api/superadmin/organizations/{}", org_id),
            &token,
            &json!({}),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error_type"], "bad_request");
}

#[tokio::test]
async fn test_organization_search_treats_wildcards_literally() {
    let app = setup_app().await;
    let token = app.login_superadmin().await;

    for (name, code) in [
        ("100% Facilities", "hundred"),
        ("Plain Services", "plain"),
        ("Acme_West", "acmewest"),
        ("AcmeXWest", "acmexwest"),
    ] {
        let response = app
            .send(create_request(
                "POST",
                "/api/superadmin/organizations",
                &token,
                &json!({ "name": name, "code": code }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    // "%" はワイルドカードではなく文字として一致する
    let response = app
        .send(create_get_request(
            "/api/superadmin/organizations?search=%25",
            &token,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["pagination"]["total_count"], 1);
    assert_eq!(body["data"]["items"][0]["code"], "hundred");

    // "_" も同様
    let response = app
        .send(create_get_request(
            "/api/superadmin/organizations?search=e_w",
            &token,
        ))
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["pagination"]["total_count"], 1);
    assert_eq!(body["data"]["items"][0]["code"], "acmewest");
}

#[tokio::test]
async fn test_overlong_search_is_truncated_not_rejected() {
    let app = setup_app().await;
    let token = app.login_superadmin().await;

    let search = "a".repeat(150);
    let response = app
        .send(create_get_request(
            &format!("/api/superadmin/users?search={}", search),
            &token,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["pagination"]["total_count"], 0);
}

#[tokio::test]
async fn test_user_creation_rejects_superadmin_role_and_weak_password() {
    let app = setup_app().await;
    let token = app.login_superadmin().await;
    let org_id = app.create_organization(&token, "acme").await;

    let response = app
        .send(create_request(
            "POST",
            "/api/superadmin/users",
            &token,
            &json!({
                "email": "boss@acme.test",
                "full_name": "Boss",
                "password": "Str0ng!Password#1",
                "role": "SUPER_ADMIN",
                "org_id": org_id,
            }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .send(create_request(
            "POST",
            "/api/superadmin/users",
            &token,
            &json!({
                "email": "weak@acme.test",
                "full_name": "Weak",
                "password": "password",
                "role": "VIEWER",
                "org_id": org_id,
            }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bulk_status_skips_superadmins() {
    // Arrange
    let app = setup_app().await;
    let token = app.login_superadmin().await;
    let session = response_json(
        app.send(create_get_request("/api/superadmin/session", &token))
            .await,
    )
    .await;
    let superadmin_id = session["data"]["user_id"].as_str().unwrap().to_string();
    let org_id = app.create_organization(&token, "acme").await;
    let user_id = app
        .create_tenant_user(&token, org_id, "viewer@acme.test", "VIEWER")
        .await;
    let unknown_id = Uuid::new_v4();

    // Act
    let response = app
        .send(create_request(
            "POST",
            "/api/superadmin/users/bulk-status",
            &token,
            &json!({
                "user_ids": [superadmin_id, user_id, unknown_id],
                "status": "suspended",
            }),
        ))
        .await;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["requested"], 3);
    assert_eq!(body["data"]["updated"], 1);
    assert_eq!(body["data"]["skipped_super_admins"][0], superadmin_id);
    assert_eq!(body["data"]["not_found"][0], unknown_id.to_string());

    // スーパー管理者は引き続きログインできる
    app.login_superadmin().await;
}

#[tokio::test]
async fn test_custom_role_requires_permissions() {
    let app = setup_app().await;
    let token = app.login_superadmin().await;

    let empty = app
        .send(create_request(
            "POST",
            "/api/superadmin/roles",
            &token,
            &json!({ "name": "inspector", "permissions": [] }),
        ))
        .await;
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);

    let unknown = app
        .send(create_request(
            "POST",
            "/api/superadmin/roles",
            &token,
            &json!({ "name": "inspector", "permissions": ["SPACESHIP:FLY"] }),
        ))
        .await;
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);

    let created = app
        .send(create_request(
            "POST",
            "/api/superadmin/roles",
            &token,
            &json!({ "name": "inspector", "permissions": ["VENDOR:VIEW", "WORK_ORDER:VIEW"] }),
        ))
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let matrix = app
        .send(create_get_request("/api/superadmin/roles/matrix", &token))
        .await;
    assert_eq!(matrix.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_setting_upsert_reports_creation() {
    let app = setup_app().await;
    let token = app.login_superadmin().await;

    let first = app
        .send(create_request(
            "PUT",
            "/api/superadmin/settings/maintenance.enabled",
            &token,
            &json!({ "value": "false", "value_type": "boolean" }),
        ))
        .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .send(create_request(
            "PUT",
            "/api/superadmin/settings/maintenance.enabled",
            &token,
            &json!({ "value": "true" }),
        ))
        .await;
    assert_eq!(second.status(), StatusCode::OK);
    let body = response_json(second).await;
    assert_eq!(body["data"]["typed_value"], true);

    // 型と合わない値は拒否
    let invalid = app
        .send(create_request(
            "PUT",
            "/api/superadmin/settings/maintenance.enabled",
            &token,
            &json!({ "value": "maybe" }),
        ))
        .await;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_branding_update_is_public() {
    let app = setup_app().await;
    let token = app.login_superadmin().await;

    let response = app
        .send(create_request(
            "PATCH",
            "/api/superadmin/branding",
            &token,
            &json!({ "company_name": "Fixzit Arabia", "primary_color": "#0061a8" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .send(create_public_request("GET", "/api/branding", &json!({})))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["company_name"], "Fixzit Arabia");
    assert_eq!(body["data"]["primary_color"], "#0061a8");
    assert!(body["data"].get("updated_by").is_none());
}

#[tokio::test]
async fn test_branding_colors_are_stored_lowercase() {
    let app = setup_app().await;
    let token = app.login_superadmin().await;

    let response = app
        .send(create_request(
            "PATCH",
            "/api/superadmin/branding",
            &token,
            &json!({ "primary_color": "#00A8FF", "secondary_color": "#ABC" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["primary_color"], "#00a8ff");
    assert_eq!(body["data"]["secondary_color"], "#abc");

    let response = app
        .send(create_get_request("/api/superadmin/branding", &token))
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["primary_color"], "#00a8ff");
}

#[tokio::test]
async fn test_webhook_test_delivery_reports_failure() {
    let app = setup_app().await;
    let token = app.login_superadmin().await;

    let created = app
        .send(create_request(
            "POST",
            "/api/superadmin/webhooks",
            &token,
            &json!({
                "name": "Closed port",
                "url": "http://127.0.0.1:9/hook",
                "events": ["webhook.test"],
            }),
        ))
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let body = response_json(created).await;
    let webhook_id = body["data"]["id"].as_str().unwrap().to_string();
    assert!(body["data"]["secret"].as_str().unwrap().len() >= 16);

    // 接続できなくてもエンドポイント自体は成功し、結果を返す
    let response = app
        .send(create_empty_request(
            "POST",
            &format!("/api/superadmin/webhooks/{}/test", webhook_id),
            &token,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["delivered"], false);
    assert!(body["data"]["error"].is_string());
}

#[tokio::test]
async fn test_webhook_rejects_unknown_events() {
    let app = setup_app().await;
    let token = app.login_superadmin().await;

    let response = app
        .send(create_request(
            "POST",
            "/api/superadmin/webhooks",
            &token,
            &json!({
                "name": "Bad events",
                "url": "https://hooks.example.com/in",
                "events": ["order.teleported"],
            }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_scheduled_task_run_requires_enabled_task() {
    let app = setup_app().await;
    let token = app.login_superadmin().await;

    let created = app
        .send(create_request(
            "POST",
            "/api/superadmin/scheduled-tasks",
            &token,
            &json!({
                "name": "Nightly cleanup",
                "task_type": "data_cleanup",
                "cron_expression": "0 3 * * *",
                "enabled": false,
            }),
        ))
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let body = response_json(created).await;
    let task_id = body["data"]["id"].as_str().unwrap().to_string();

    let disabled = app
        .send(create_empty_request(
            "POST",
            &format!("/api/superadmin/scheduled-tasks/{}/run", task_id),
            &token,
        ))
        .await;
    assert_eq!(disabled.status(), StatusCode::CONFLICT);

    let enabled = app
        .send(create_request(
            "PATCH",
            &format!("/api/superadmin/scheduled-tasks/{}", task_id),
            &token,
            &json!({ "enabled": true }),
        ))
        .await;
    assert_eq!(enabled.status(), StatusCode::OK);

    let run = app
        .send(create_empty_request(
            "POST",
            &format!("/api/superadmin/scheduled-tasks/{}/run", task_id),
            &token,
        ))
        .await;
    assert_eq!(run.status(), StatusCode::OK);
    let body = response_json(run).await;
    assert_eq!(body["data"]["last_run_status"], "triggered");
}

#[tokio::test]
async fn test_scheduled_task_rejects_invalid_cron() {
    let app = setup_app().await;
    let token = app.login_superadmin().await;

    let response = app
        .send(create_request(
            "POST",
            "/api/superadmin/scheduled-tasks",
            &token,
            &json!({
                "name": "Broken",
                "task_type": "backup",
                "cron_expression": "61 * * * *",
            }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_coupon_percentage_over_100_is_rejected() {
    let app = setup_app().await;
    let token = app.login_superadmin().await;

    let response = app
        .send(create_request(
            "POST",
            "/api/superadmin/billing/coupons",
            &token,
            &json!({ "code": "HUGE", "discount_type": "percentage", "discount_value": 150.0 }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_quote_applies_coupon_to_default_tier() {
    let app = setup_app().await;
    let token = app.login_superadmin().await;

    let coupon = app
        .send(create_request(
            "POST",
            "/api/superadmin/billing/coupons",
            &token,
            &json!({ "code": "save10", "discount_type": "percentage", "discount_value": 10.0 }),
        ))
        .await;
    assert_eq!(coupon.status(), StatusCode::CREATED);
    let body = response_json(coupon).await;
    assert_eq!(body["data"]["code"], "SAVE10");

    let response = app
        .send(create_request(
            "POST",
            "/api/superadmin/billing/quote",
            &token,
            &json!({ "tier_code": "starter", "seats": 2, "coupon_code": "SAVE10" }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["subtotal"], 19_800);
    assert_eq!(body["data"]["coupon_discount"], 1_980);
    assert_eq!(body["data"]["total"], 17_820);
}

#[tokio::test]
async fn test_subscription_upsert_reports_creation() {
    let app = setup_app().await;
    let token = app.login_superadmin().await;
    let org_id = app.create_organization(&token, "acme").await;
    let uri = format!("/api/superadmin/organizations/{}/subscription", org_id);

    let first = app
        .send(create_request(
            "PUT",
            &uri,
            &token,
            &json!({ "tier_code": "starter", "seats": 5 }),
        ))
        .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .send(create_request(
            "PUT",
            &uri,
            &token,
            &json!({ "tier_code": "professional", "seats": 20 }),
        ))
        .await;
    assert_eq!(second.status(), StatusCode::OK);

    // プランの上限を超える席数は拒否
    let too_many = app
        .send(create_request(
            "PUT",
            &uri,
            &token,
            &json!({ "tier_code": "starter", "seats": 500 }),
        ))
        .await;
    assert_eq!(too_many.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_benchmark_compare_positions_price() {
    let app = setup_app().await;
    let token = app.login_superadmin().await;

    let created = app
        .send(create_request(
            "POST",
            "/api/superadmin/benchmarks",
            &token,
            &json!({
                "category": "hvac",
                "service_code": "ac-service",
                "service_name": "AC maintenance",
                "unit_description": "per unit",
                "min_price": 100.0,
                "typical_price": 150.0,
                "max_price": 250.0,
            }),
        ))
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let response = app
        .send(create_get_request(
            "/api/superadmin/benchmarks/compare?service_code=ac-service&price=300",
            &token,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["position"], "above_range");
    assert_eq!(body["data"]["deviation_percent"], 100.0);

    let missing = app
        .send(create_get_request(
            "/api/superadmin/benchmarks/compare?service_code=unknown&price=10",
            &token,
        ))
        .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_benchmark_rejects_inverted_range() {
    let app = setup_app().await;
    let token = app.login_superadmin().await;

    let response = app
        .send(create_request(
            "POST",
            "/api/superadmin/benchmarks",
            &token,
            &json!({
                "category": "hvac",
                "service_code": "ac-service",
                "service_name": "AC maintenance",
                "unit_description": "per unit",
                "min_price": 300.0,
                "typical_price": 150.0,
                "max_price": 250.0,
            }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_audit_log_records_mutations() {
    let app = setup_app().await;
    let token = app.login_superadmin().await;
    let org_id = app.create_organization(&token, "acme").await;

    let response = app
        .send(create_get_request(
            "/api/superadmin/audit-logs?entity_type=organization",
            &token,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["pagination"]["total_count"], 1);
    let entry = &body["data"]["items"][0];
    assert_eq!(entry["action"], "create");
    assert_eq!(entry["entity_id"], org_id.to_string());
    assert_eq!(entry["actor_role"], "SUPER_ADMIN");

    let log_id = entry["id"].as_str().unwrap().to_string();
    let detail = app
        .send(create_get_request(
            &format!("/api/superadmin/audit-logs/{}", log_id),
            &token,
        ))
        .await;
    assert_eq!(detail.status(), StatusCode::OK);

    let stats = app
        .send(create_get_request("/api/superadmin/audit-logs/stats", &token))
        .await;
    assert_eq!(stats.status(), StatusCode::OK);
    let body = response_json(stats).await;
    // ログイン + 組織作成
    assert!(body["data"]["total"].as_u64().unwrap() >= 2);
}

#[tokio::test]
async fn test_audit_cleanup_enforces_minimum_retention() {
    let app = setup_app().await;
    let token = app.login_superadmin().await;

    let too_short = app
        .send(create_request(
            "POST",
            "/api/superadmin/audit-logs/cleanup",
            &token,
            &json!({ "days_to_keep": 7 }),
        ))
        .await;
    assert_eq!(too_short.status(), StatusCode::BAD_REQUEST);

    let response = app
        .send(create_request(
            "POST",
            "/api/superadmin/audit-logs/cleanup",
            &token,
            &json!({ "days_to_keep": 90 }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["deleted"], 0);
}

#[tokio::test]
async fn test_superadmin_status_cannot_be_patched() {
    let app = setup_app().await;
    let token = app.login_superadmin().await;
    let session = response_json(
        app.send(create_get_request("/api/superadmin/session", &token))
            .await,
    )
    .await;
    let superadmin_id = session["data"]["user_id"].as_str().unwrap().to_string();

    let response = app
        .send(create_request(
            "PATCH",
            &format!("/api/superadmin/users/{}", superadmin_id),
            &token,
            &json!({ "status": "suspended" }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    // 変更されていないのでログインできる
    app.login_superadmin().await;
}

#[tokio::test]
async fn test_system_role_cannot_be_deleted() {
    let app = setup_app().await;
    let token = app.login_superadmin().await;
    let now = Utc::now();
    let system_role = role_model::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("platform_auditor".to_string()),
        description: Set(None),
        permissions: Set(json!(["REPORT:VIEW"])),
        is_system: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&app.state.db)
    .await
    .unwrap();

    let response = app
        .send(create_empty_request(
            "DELETE",
            &format!("/api/superadmin/roles/{}", system_role.id),
            &token,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let still_there = app
        .send(create_get_request(
            &format!("/api/superadmin/roles/{}", system_role.id),
            &token,
        ))
        .await;
    assert_eq!(still_there.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_assigned_role_cannot_be_deleted() {
    let app = setup_app().await;
    let token = app.login_superadmin().await;
    let org_id = app.create_organization(&token, "acme").await;

    let created = app
        .send(create_request(
            "POST",
            "/api/superadmin/roles",
            &token,
            &json!({ "name": "inspector", "permissions": ["VENDOR:VIEW"] }),
        ))
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let role_id = response_json(created).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let user = app
        .send(create_request(
            "POST",
            "/api/superadmin/users",
            &token,
            &json!({
                "email": "inspector@acme.test",
                "full_name": "Site Inspector",
                "password": common::app_helper::TENANT_PASSWORD,
                "role": "VIEWER",
                "org_id": org_id,
                "custom_role_id": role_id,
            }),
        ))
        .await;
    assert_eq!(user.status(), StatusCode::CREATED);

    let response = app
        .send(create_empty_request(
            "DELETE",
            &format!("/api/superadmin/roles/{}", role_id),
            &token,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_tier_with_live_subscription_cannot_be_deactivated() {
    let app = setup_app().await;
    let token = app.login_superadmin().await;
    let org_id = app.create_organization(&token, "acme").await;

    let subscribed = app
        .send(create_request(
            "PUT",
            &format!("/api/superadmin/organizations/{}/subscription", org_id),
            &token,
            &json!({ "tier_code": "starter", "seats": 2 }),
        ))
        .await;
    assert_eq!(subscribed.status(), StatusCode::CREATED);

    let tiers = response_json(
        app.send(create_get_request("/api/superadmin/billing/tiers", &token))
            .await,
    )
    .await;
    let starter_id = tiers["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|tier| tier["code"] == "starter")
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .send(create_empty_request(
            "DELETE",
            &format!("/api/superadmin/billing/tiers/{}", starter_id),
            &token,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = response_json(response).await;
    assert_eq!(body["error_type"], "conflict");
}

#[tokio::test]
async fn test_setting_search_treats_regex_metacharacters_literally() {
    let app = setup_app().await;
    let token = app.login_superadmin().await;

    for (key, description) in [
        ("billing.rate", "Price (USD)"),
        ("billingxrate", "Price in SAR"),
    ] {
        let response = app
            .send(create_request(
                "PUT",
                &format!("/api/superadmin/settings/{}", key),
                &token,
                &json!({ "value": "1", "value_type": "number", "description": description }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let by_key = response_json(
        app.send(create_get_request("/api/superadmin/settings?search=g.r", &token))
            .await,
    )
    .await;
    let keys: Vec<&str> = by_key["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["billing.rate"]);

    let by_description = response_json(
        app.send(create_get_request(
            "/api/superadmin/settings?search=%28usd%29",
            &token,
        ))
        .await,
    )
    .await;
    assert_eq!(by_description["data"].as_array().unwrap().len(), 1);
    assert_eq!(by_description["data"][0]["key"], "billing.rate");
}

#[tokio::test]
async fn test_descriptions_can_be_cleared_with_null() {
    let app = setup_app().await;
    let token = app.login_superadmin().await;

    let role = response_json(
        app.send(create_request(
            "POST",
            "/api/superadmin/roles",
            &token,
            &json!({
                "name": "inspector",
                "description": "Read-only site inspections",
                "permissions": ["VENDOR:VIEW"],
            }),
        ))
        .await,
    )
    .await;
    let role_id = role["data"]["id"].as_str().unwrap().to_string();

    let cleared = app
        .send(create_request(
            "PATCH",
            &format!("/api/superadmin/roles/{}", role_id),
            &token,
            &json!({ "description": null }),
        ))
        .await;
    assert_eq!(cleared.status(), StatusCode::OK);
    let body = response_json(cleared).await;
    assert!(body["data"]["description"].is_null());
    assert_eq!(body["data"]["name"], "inspector");

    let flag = response_json(
        app.send(create_request(
            "POST",
            "/api/superadmin/feature-flags",
            &token,
            &json!({
                "key": "new_dashboard",
                "name": "New dashboard",
                "description": "Redesigned landing page",
            }),
        ))
        .await,
    )
    .await;
    let flag_id = flag["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(flag["data"]["description"], "Redesigned landing page");

    // 省略時は変更しない
    let renamed = response_json(
        app.send(create_request(
            "PATCH",
            &format!("/api/superadmin/feature-flags/{}", flag_id),
            &token,
            &json!({ "name": "Dashboard v2" }),
        ))
        .await,
    )
    .await;
    assert_eq!(renamed["data"]["description"], "Redesigned landing page");

    let cleared = app
        .send(create_request(
            "PATCH",
            &format!("/api/superadmin/feature-flags/{}", flag_id),
            &token,
            &json!({ "description": null }),
        ))
        .await;
    assert_eq!(cleared.status(), StatusCode::OK);
    let body = response_json(cleared).await;
    assert!(body["data"]["description"].is_null());
}
