// src/service/audit_log_service.rs
use crate::api::dto::audit_log_dto::{
    AuditLogQuery, AuditLogResponse, AuditStatsResponse, CleanupResponse, CountEntry,
};
use crate::domain::audit_log_model::{AuditAction, AuditActor, AuditEntry, AuditResult};
use crate::error::AppResult;
use crate::log_with_context;
use crate::repository::audit_log_repository::{AuditLogFilter, AuditLogRepository};
use crate::types::PaginatedResponse;
use crate::utils::error_helper::{not_found_error, parse_field, validation_error};
use crate::utils::search::sanitize_search;
use chrono::{Duration, Utc};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// 保持期間の下限（日）
pub const MIN_RETENTION_DAYS: i64 = 30;

pub struct AuditLogService {
    audit_log_repo: Arc<AuditLogRepository>,
}

impl AuditLogService {
    pub fn new(audit_log_repo: Arc<AuditLogRepository>) -> Self {
        Self { audit_log_repo }
    }

    /// 監査ログを記録する。書き込みに失敗しても呼び出し元の処理は失敗させない
    pub async fn record(&self, entry: AuditEntry) {
        let model = entry.build();
        let action = model.action.clone().take().unwrap_or_default();
        let entity_type = model.entity_type.clone().take().unwrap_or_default();

        match self.audit_log_repo.create(model).await {
            Ok(log) => {
                log_with_context!(
                    tracing::Level::DEBUG,
                    "Audit log recorded",
                    "audit_id" => log.id,
                    "action" => &log.action,
                    "entity_type" => &log.entity_type,
                    "result" => &log.result
                );
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    action = %action,
                    entity_type = %entity_type,
                    "Failed to write audit log"
                );
            }
        }
    }

    fn build_filter(query: &AuditLogQuery) -> AppResult<AuditLogFilter> {
        let result = match &query.result {
            Some(value) => Some(parse_field::<AuditResult>("result", value)?.as_str().to_string()),
            None => None,
        };
        if let (Some(from), Some(to)) = (query.from, query.to) {
            if from > to {
                return Err(validation_error("from", "must not be later than 'to'"));
            }
        }

        Ok(AuditLogFilter {
            actor_id: query.actor_id,
            org_id: query.org_id,
            action: query.action.as_deref().map(|a| a.trim().to_lowercase()),
            entity_type: query.entity_type.as_deref().map(|e| e.trim().to_lowercase()),
            result,
            search: query.search.as_deref().and_then(sanitize_search),
            from: query.from,
            to: query.to,
        })
    }

    pub async fn list(
        &self,
        query: &AuditLogQuery,
    ) -> AppResult<PaginatedResponse<AuditLogResponse>> {
        let filter = Self::build_filter(query)?;
        let (page, per_page) = query.pagination().get_pagination();

        let (logs, total) = self.audit_log_repo.list(&filter, page, per_page).await?;
        let items = logs.into_iter().map(AuditLogResponse::from).collect();
        Ok(PaginatedResponse::new(items, page, per_page, total))
    }

    pub async fn get(&self, id: Uuid) -> AppResult<AuditLogResponse> {
        let log = self
            .audit_log_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Audit log", &id.to_string(), "audit_log_service::get"))?;
        Ok(log.into())
    }

    pub async fn stats(&self, query: &AuditLogQuery) -> AppResult<AuditStatsResponse> {
        let filter = Self::build_filter(query)?;

        let total = self.audit_log_repo.count(&filter).await?;
        let to_entries = |rows: Vec<(String, i64)>| {
            rows.into_iter()
                .map(|(key, count)| CountEntry { key, count })
                .collect::<Vec<_>>()
        };
        let by_action = to_entries(self.audit_log_repo.count_by_action(&filter).await?);
        let by_result = to_entries(self.audit_log_repo.count_by_result(&filter).await?);

        Ok(AuditStatsResponse {
            total,
            by_action,
            by_result,
        })
    }

    /// 保持期間より古いログを削除し、削除自体も記録する
    pub async fn cleanup(&self, days_to_keep: i64, actor: AuditActor) -> AppResult<CleanupResponse> {
        if days_to_keep < MIN_RETENTION_DAYS {
            return Err(validation_error(
                "days_to_keep",
                &format!("must be at least {}", MIN_RETENTION_DAYS),
            ));
        }

        let cutoff = Utc::now() - Duration::days(days_to_keep);
        let deleted = self.audit_log_repo.delete_older_than(cutoff).await?;

        tracing::info!(deleted = deleted, cutoff = %cutoff, "Audit log retention cleanup finished");

        self.record(
            AuditEntry::new(actor, AuditAction::Cleanup, "audit_log").details(json!({
                "days_to_keep": days_to_keep,
                "deleted": deleted,
                "cutoff": cutoff,
            })),
        )
        .await;

        Ok(CleanupResponse { deleted, cutoff })
    }
}
