// src/service/bootstrap_service.rs
use crate::config::SuperAdminBootstrap;
use crate::domain::billing_tier_model;
use crate::domain::role::RoleName;
use crate::domain::user_model::{self, UserStatus};
use crate::error::{AppError, AppResult};
use crate::repository::billing_repository::BillingRepository;
use crate::repository::user_repository::UserRepository;
use chrono::Utc;
use sea_orm::Set;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// 起動時の初期データ投入
pub struct BootstrapService {
    user_repo: Arc<UserRepository>,
    billing_repo: Arc<BillingRepository>,
}

/// (code, name, 月額, 年間割引%, 最大ユーザー数, 機能)
const DEFAULT_TIERS: [(&str, &str, i64, f64, i32, &[&str]); 3] = [
    ("starter", "Starter", 9_900, 10.0, 10, &["work_orders", "vendors"]),
    (
        "professional",
        "Professional",
        29_900,
        15.0,
        50,
        &["work_orders", "vendors", "reports", "webhooks"],
    ),
    (
        "enterprise",
        "Enterprise",
        99_900,
        20.0,
        1_000,
        &["work_orders", "vendors", "reports", "webhooks", "sso", "audit_export"],
    ),
];

impl BootstrapService {
    pub fn new(user_repo: Arc<UserRepository>, billing_repo: Arc<BillingRepository>) -> Self {
        Self {
            user_repo,
            billing_repo,
        }
    }

    pub async fn run(&self, superadmin: Option<&SuperAdminBootstrap>) -> AppResult<()> {
        match superadmin {
            Some(seed) => self.ensure_superadmin(seed).await?,
            None => warn!("SUPERADMIN_EMAIL is not set; skipping superadmin bootstrap"),
        }
        self.ensure_default_tiers().await
    }

    /// 同じメールのユーザーが既にいれば何もしない
    async fn ensure_superadmin(&self, seed: &SuperAdminBootstrap) -> AppResult<()> {
        if !seed.password_hash.starts_with("$argon2") {
            return Err(AppError::InternalServerError(
                "SUPERADMIN_PASSWORD_HASH must be an argon2 PHC string".to_string(),
            ));
        }

        let email = seed.email.trim().to_lowercase();
        if let Some(existing) = self.user_repo.find_by_email(&email).await? {
            if !existing.is_super_admin() {
                warn!(
                    email = %email,
                    role = %existing.role,
                    "Bootstrap email belongs to a non-superadmin account"
                );
            }
            return Ok(());
        }

        let now = Utc::now();
        let user = self
            .user_repo
            .create(user_model::ActiveModel {
                id: Set(Uuid::new_v4()),
                org_id: Set(None),
                email: Set(email),
                full_name: Set("Platform Superadmin".to_string()),
                password_hash: Set(seed.password_hash.clone()),
                role: Set(RoleName::SuperAdmin.as_str().to_string()),
                custom_role_id: Set(None),
                status: Set(UserStatus::Active.as_str().to_string()),
                last_login_at: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
            })
            .await?;

        info!(user_id = %user.id, email = %user.email, "Superadmin account created");
        Ok(())
    }

    async fn ensure_default_tiers(&self) -> AppResult<()> {
        if self.billing_repo.count_tiers().await? > 0 {
            return Ok(());
        }

        let now = Utc::now();
        for (code, name, monthly_price, discount, max_users, features) in DEFAULT_TIERS {
            self.billing_repo
                .create_tier(billing_tier_model::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    code: Set(code.to_string()),
                    name: Set(name.to_string()),
                    monthly_price: Set(monthly_price),
                    annual_discount_percent: Set(discount),
                    max_users: Set(max_users),
                    features: Set(json!(features)),
                    is_active: Set(true),
                    created_at: Set(now),
                    updated_at: Set(now),
                })
                .await?;
        }

        info!(count = DEFAULT_TIERS.len(), "Default billing tiers created");
        Ok(())
    }
}
