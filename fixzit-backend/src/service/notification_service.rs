// src/service/notification_service.rs
use crate::api::dto::notification_dto::{
    BroadcastResponse, CreateNotificationRequest, NotificationListQuery, NotificationResponse,
};
use crate::domain::audit_log_model::{AuditAction, AuditActor, AuditEntry};
use crate::domain::notification_model::{self, NotificationChannel, NotificationPriority};
use crate::domain::tenant::TenantContext;
use crate::error::AppResult;
use crate::repository::notification_repository::NotificationRepository;
use crate::repository::organization_repository::OrganizationRepository;
use crate::service::audit_log_service::AuditLogService;
use crate::types::PaginatedResponse;
use crate::utils::error_helper::{not_found_error, parse_field};
use chrono::Utc;
use sea_orm::Set;
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// テナント画面に返す最大件数
const TENANT_FEED_LIMIT: usize = 100;

/// ロール絞り込み前に1回で読む件数
const TENANT_FEED_BATCH: u64 = 200;

pub struct NotificationService {
    notification_repo: Arc<NotificationRepository>,
    org_repo: Arc<OrganizationRepository>,
    audit_service: Arc<AuditLogService>,
}

impl NotificationService {
    pub fn new(
        notification_repo: Arc<NotificationRepository>,
        org_repo: Arc<OrganizationRepository>,
        audit_service: Arc<AuditLogService>,
    ) -> Self {
        Self {
            notification_repo,
            org_repo,
            audit_service,
        }
    }

    /// 対象組織ごとに1件、指定がなければ全体宛に1件作成する
    pub async fn broadcast(
        &self,
        request: CreateNotificationRequest,
        actor: AuditActor,
    ) -> AppResult<BroadcastResponse> {
        let channel = match &request.channel {
            Some(value) => parse_field::<NotificationChannel>("channel", value)?,
            None => NotificationChannel::InApp,
        };
        let priority = match &request.priority {
            Some(value) => parse_field::<NotificationPriority>("priority", value)?,
            None => NotificationPriority::Normal,
        };

        let requested_orgs: Vec<Uuid> = request
            .org_ids
            .unwrap_or_default()
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if !requested_orgs.is_empty() {
            let existing: BTreeSet<Uuid> = self
                .org_repo
                .existing_ids(&requested_orgs)
                .await?
                .into_iter()
                .collect();
            if let Some(missing) = requested_orgs.iter().find(|id| !existing.contains(id)) {
                return Err(not_found_error(
                    "Organization",
                    &missing.to_string(),
                    "notification_service::broadcast",
                ));
            }
        }

        let mut role_names: Vec<&'static str> = Vec::new();
        for role in request.target_roles.unwrap_or_default() {
            if !role_names.contains(&role.as_str()) {
                role_names.push(role.as_str());
            }
        }
        let target_roles = json!(role_names);
        let targets: Vec<Option<Uuid>> = if requested_orgs.is_empty() {
            vec![None]
        } else {
            requested_orgs.iter().copied().map(Some).collect()
        };

        let now = Utc::now();
        let rows = targets
            .into_iter()
            .map(|org_id| notification_model::ActiveModel {
                id: Set(Uuid::new_v4()),
                org_id: Set(org_id),
                title: Set(request.title.trim().to_string()),
                message: Set(request.message.clone()),
                channel: Set(channel.as_str().to_string()),
                priority: Set(priority.as_str().to_string()),
                target_roles: Set(target_roles.clone()),
                created_by: Set(actor.user_id),
                created_at: Set(now),
            })
            .collect();

        let created = self.notification_repo.create_many(rows).await?;

        info!(
            count = created.len(),
            channel = %channel,
            priority = %priority,
            "Notification broadcast created"
        );
        self.audit_service
            .record(
                AuditEntry::new(actor, AuditAction::Broadcast, "notification").details(json!({
                    "title": request.title,
                    "channel": channel,
                    "priority": priority,
                    "org_ids": requested_orgs,
                    "created": created.len(),
                })),
            )
            .await;

        Ok(BroadcastResponse {
            created: created.len(),
            notifications: created.into_iter().map(NotificationResponse::from).collect(),
        })
    }

    pub async fn list(
        &self,
        query: &NotificationListQuery,
    ) -> AppResult<PaginatedResponse<NotificationResponse>> {
        let (page, per_page) = query.pagination().get_pagination();
        let (items, total) = self
            .notification_repo
            .list(query.org_id, page, per_page)
            .await?;
        let items = items.into_iter().map(NotificationResponse::from).collect();
        Ok(PaginatedResponse::new(items, page, per_page, total))
    }

    /// 自組織宛と全体宛のうち、呼び出し元のロールが対象のもの
    ///
    /// `target_roles` はJSON列のため、ページ単位で読みながら絞り込む。
    pub async fn list_for_tenant(&self, ctx: &TenantContext) -> AppResult<Vec<NotificationResponse>> {
        let mut visible = Vec::new();
        let mut page = 0;
        loop {
            let batch = self
                .notification_repo
                .list_for_org(ctx.org_id, page, TENANT_FEED_BATCH)
                .await?;
            let exhausted = (batch.len() as u64) < TENANT_FEED_BATCH;
            visible.extend(
                batch
                    .into_iter()
                    .filter(|n| ctx.is_super_admin || n.is_visible_to(ctx.role)),
            );
            if exhausted || visible.len() >= TENANT_FEED_LIMIT {
                break;
            }
            page += 1;
        }
        visible.truncate(TENANT_FEED_LIMIT);

        Ok(visible.into_iter().map(NotificationResponse::from).collect())
    }
}
