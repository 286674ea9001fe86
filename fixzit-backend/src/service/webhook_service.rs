// src/service/webhook_service.rs
use crate::api::dto::webhook_dto::{
    CreateWebhookRequest, UpdateWebhookRequest, WebhookListQuery, WebhookResponse,
    WebhookTestResponse,
};
use crate::domain::audit_log_model::{AuditAction, AuditActor, AuditEntry, AuditResult};
use crate::domain::webhook_model::{self, WebhookEvent};
use crate::error::{AppError, AppResult};
use crate::repository::organization_repository::OrganizationRepository;
use crate::repository::webhook_repository::WebhookRepository;
use crate::service::audit_log_service::AuditLogService;
use crate::utils::signature::{generate_secret, sign_payload, SIGNATURE_HEADER};
use crate::utils::error_helper::not_found_error;
use chrono::Utc;
use reqwest::{header::CONTENT_TYPE, Client};
use sea_orm::Set;
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use uuid::Uuid;

pub const EVENT_HEADER: &str = "X-Fixzit-Event";
const USER_AGENT: &str = concat!("fixzit-backend/", env!("CARGO_PKG_VERSION"));

/// Webhook管理とテスト送信
pub struct WebhookService {
    webhook_repo: Arc<WebhookRepository>,
    org_repo: Arc<OrganizationRepository>,
    audit_service: Arc<AuditLogService>,
    client: Client,
}

impl WebhookService {
    pub fn new(
        webhook_repo: Arc<WebhookRepository>,
        org_repo: Arc<OrganizationRepository>,
        audit_service: Arc<AuditLogService>,
        timeout_seconds: u64,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            webhook_repo,
            org_repo,
            audit_service,
            client,
        })
    }

    pub async fn list(&self, query: &WebhookListQuery) -> AppResult<Vec<WebhookResponse>> {
        let webhooks = self.webhook_repo.list(query.org_id).await?;
        Ok(webhooks.into_iter().map(WebhookResponse::from).collect())
    }

    pub async fn get(&self, id: Uuid) -> AppResult<WebhookResponse> {
        Ok(self.find(id).await?.into())
    }

    /// 作成時のみ平文のシークレットを返す
    pub async fn create(
        &self,
        request: CreateWebhookRequest,
        actor: AuditActor,
    ) -> AppResult<WebhookResponse> {
        if let Some(org_id) = request.org_id {
            if self.org_repo.find_by_id(org_id).await?.is_none() {
                return Err(not_found_error(
                    "Organization",
                    &org_id.to_string(),
                    "webhook_service::create",
                ));
            }
        }

        let now = Utc::now();
        let webhook = self
            .webhook_repo
            .create(webhook_model::ActiveModel {
                id: Set(Uuid::new_v4()),
                org_id: Set(request.org_id),
                name: Set(request.name.trim().to_string()),
                url: Set(request.url.trim().to_string()),
                events: Set(json!(dedupe_events(&request.events))),
                secret: Set(request.secret.unwrap_or_else(generate_secret)),
                is_active: Set(request.is_active.unwrap_or(true)),
                last_delivery_at: Set(None),
                last_delivery_status: Set(None),
                failure_count: Set(0),
                created_at: Set(now),
                updated_at: Set(now),
            })
            .await?;

        info!(webhook_id = %webhook.id, url = %webhook.url, "Webhook registered");
        self.audit_service
            .record(
                AuditEntry::new(actor, AuditAction::Create, "webhook")
                    .entity_id(webhook.id)
                    .org_id(webhook.org_id)
                    .details(json!({ "url": webhook.url, "events": webhook.event_names() })),
            )
            .await;

        Ok(WebhookResponse::with_plain_secret(webhook))
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateWebhookRequest,
        actor: AuditActor,
    ) -> AppResult<WebhookResponse> {
        let current = self.find(id).await?;
        let mut active: webhook_model::ActiveModel = current.into();

        if let Some(name) = request.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(url) = request.url {
            active.url = Set(url.trim().to_string());
        }
        if let Some(events) = &request.events {
            active.events = Set(json!(dedupe_events(events)));
        }
        if let Some(is_active) = request.is_active {
            active.is_active = Set(is_active);
            if is_active {
                active.failure_count = Set(0);
            }
        }
        let rotated = request.rotate_secret.unwrap_or(false);
        if rotated {
            active.secret = Set(generate_secret());
        }

        let webhook = self.webhook_repo.update(active).await?;
        self.audit_service
            .record(
                AuditEntry::new(actor, AuditAction::Update, "webhook")
                    .entity_id(webhook.id)
                    .org_id(webhook.org_id)
                    .details(json!({ "is_active": webhook.is_active, "secret_rotated": rotated })),
            )
            .await;

        if rotated {
            Ok(WebhookResponse::with_plain_secret(webhook))
        } else {
            Ok(webhook.into())
        }
    }

    pub async fn delete(&self, id: Uuid, actor: AuditActor) -> AppResult<()> {
        let webhook = self.find(id).await?;
        self.webhook_repo.delete(id).await?;

        info!(webhook_id = %id, "Webhook deleted");
        self.audit_service
            .record(
                AuditEntry::new(actor, AuditAction::Delete, "webhook")
                    .entity_id(id)
                    .org_id(webhook.org_id)
                    .details(json!({ "url": webhook.url })),
            )
            .await;
        Ok(())
    }

    /// 署名付きテストイベントを送信し、結果を記録する
    ///
    /// 配信失敗はエラーではなく `delivered: false` として返す。
    pub async fn send_test(&self, id: Uuid, actor: AuditActor) -> AppResult<WebhookTestResponse> {
        let webhook = self.find(id).await?;

        let payload = json!({
            "id": Uuid::new_v4(),
            "event": WebhookEvent::Test.as_str(),
            "webhook_id": webhook.id,
            "org_id": webhook.org_id,
            "timestamp": Utc::now().to_rfc3339(),
            "data": { "message": "This is a test delivery from Fixzit" },
        });
        let body = serde_json::to_vec(&payload)
            .map_err(|e| AppError::InternalServerError(format!("Failed to encode payload: {}", e)))?;
        let signature = sign_payload(&webhook.secret, &body);

        let started = Instant::now();
        let outcome = self
            .client
            .post(&webhook.url)
            .header(CONTENT_TYPE, "application/json")
            .header(SIGNATURE_HEADER, signature)
            .header(EVENT_HEADER, WebhookEvent::Test.as_str())
            .body(body)
            .send()
            .await;
        let duration_ms = started.elapsed().as_millis() as u64;

        let result = match outcome {
            Ok(response) => {
                let status = response.status();
                WebhookTestResponse {
                    delivered: status.is_success(),
                    status_code: Some(status.as_u16()),
                    error: (!status.is_success())
                        .then(|| format!("Endpoint responded with {}", status)),
                    duration_ms,
                }
            }
            Err(e) => {
                warn!(webhook_id = %webhook.id, error = %e, "Webhook test delivery failed");
                WebhookTestResponse {
                    delivered: false,
                    status_code: None,
                    error: Some(delivery_error_message(&e)),
                    duration_ms,
                }
            }
        };

        let failure_count = if result.delivered {
            0
        } else {
            webhook.failure_count.saturating_add(1)
        };
        let org_id = webhook.org_id;
        let mut active: webhook_model::ActiveModel = webhook.into();
        active.last_delivery_at = Set(Some(Utc::now()));
        active.last_delivery_status = Set(Some(delivery_status_label(&result)));
        active.failure_count = Set(failure_count);
        self.webhook_repo.update(active).await?;

        let audit_result = if result.delivered {
            AuditResult::Success
        } else {
            AuditResult::Failure
        };
        self.audit_service
            .record(
                AuditEntry::new(actor, AuditAction::TestDelivery, "webhook")
                    .entity_id(id)
                    .org_id(org_id)
                    .result(audit_result)
                    .details(json!({
                        "status_code": result.status_code,
                        "error": result.error,
                        "duration_ms": result.duration_ms,
                    })),
            )
            .await;

        Ok(result)
    }

    async fn find(&self, id: Uuid) -> AppResult<webhook_model::Model> {
        self.webhook_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Webhook", &id.to_string(), "webhook_service::find"))
    }
}

fn dedupe_events(events: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(events.len());
    for event in events {
        if !unique.contains(event) {
            unique.push(event.clone());
        }
    }
    unique
}

fn delivery_status_label(result: &WebhookTestResponse) -> String {
    match (result.delivered, result.status_code) {
        (true, Some(code)) => format!("success:{}", code),
        (false, Some(code)) => format!("failed:{}", code),
        _ => "error".to_string(),
    }
}

fn delivery_error_message(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "Request timed out".to_string()
    } else if error.is_connect() {
        "Connection failed".to_string()
    } else {
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedupe_events_keeps_order() {
        let events = vec![
            "vendor.created".to_string(),
            "user.created".to_string(),
            "vendor.created".to_string(),
        ];
        assert_eq!(dedupe_events(&events), vec!["vendor.created", "user.created"]);
    }

    #[test]
    fn test_delivery_status_label() {
        let mut result = WebhookTestResponse {
            delivered: true,
            status_code: Some(200),
            error: None,
            duration_ms: 5,
        };
        assert_eq!(delivery_status_label(&result), "success:200");

        result.delivered = false;
        result.status_code = Some(500);
        assert_eq!(delivery_status_label(&result), "failed:500");

        result.status_code = None;
        assert_eq!(delivery_status_label(&result), "error");
    }
}
