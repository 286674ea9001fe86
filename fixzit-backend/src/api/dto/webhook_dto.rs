// src/api/dto/webhook_dto.rs
use crate::domain::webhook_model::Model as WebhookModel;
use crate::utils::signature::mask_secret;
use crate::utils::validation::{validate_http_url, validate_webhook_events};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWebhookRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(
        length(max = 2048, message = "URL must be 2048 characters or less"),
        custom(function = validate_http_url)
    )]
    pub url: String,

    #[validate(custom(function = validate_webhook_events))]
    pub events: Vec<String>,

    /// 省略時はサーバー側で生成
    #[validate(length(min = 16, max = 128, message = "Secret must be between 16 and 128 characters"))]
    pub secret: Option<String>,

    pub org_id: Option<Uuid>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateWebhookRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,

    #[validate(
        length(max = 2048, message = "URL must be 2048 characters or less"),
        custom(function = validate_http_url)
    )]
    pub url: Option<String>,

    #[validate(custom(function = validate_webhook_events))]
    pub events: Option<Vec<String>>,

    pub is_active: Option<bool>,

    /// true の場合シークレットを再生成する
    pub rotate_secret: Option<bool>,
}

impl UpdateWebhookRequest {
    pub fn has_updates(&self) -> bool {
        self.name.is_some()
            || self.url.is_some()
            || self.events.is_some()
            || self.is_active.is_some()
            || self.rotate_secret.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookListQuery {
    pub org_id: Option<Uuid>,
}

/// シークレットはマスクして返す
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub id: Uuid,
    pub org_id: Option<Uuid>,
    pub name: String,
    pub url: String,
    pub events: Vec<String>,
    pub secret: String,
    pub is_active: bool,
    pub last_delivery_at: Option<DateTime<Utc>>,
    pub last_delivery_status: Option<String>,
    pub failure_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WebhookResponse {
    /// 作成直後・再生成直後のみ平文のシークレットを含める
    pub fn with_plain_secret(webhook: WebhookModel) -> Self {
        let secret = webhook.secret.clone();
        let mut response = Self::from(webhook);
        response.secret = secret;
        response
    }
}

impl From<WebhookModel> for WebhookResponse {
    fn from(webhook: WebhookModel) -> Self {
        Self {
            events: webhook.event_names(),
            secret: mask_secret(&webhook.secret),
            id: webhook.id,
            org_id: webhook.org_id,
            name: webhook.name,
            url: webhook.url,
            is_active: webhook.is_active,
            last_delivery_at: webhook.last_delivery_at,
            last_delivery_status: webhook.last_delivery_status,
            failure_count: webhook.failure_count,
            created_at: webhook.created_at,
            updated_at: webhook.updated_at,
        }
    }
}

/// テスト送信の結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookTestResponse {
    pub delivered: bool,
    pub status_code: Option<u16>,
    pub error: Option<String>,
    pub duration_ms: u64,
}
