// migration/src/lib.rs
pub use sea_orm_migration::prelude::*;

// テナント・認証関連マイグレーション
mod m20260105_000001_create_organizations_table;
mod m20260105_000002_create_roles_table;
mod m20260105_000003_create_users_table;

// 監査ログ
mod m20260106_000001_create_audit_logs_table;

// プラットフォーム管理関連マイグレーション
mod m20260107_000001_create_platform_settings_tables;
mod m20260107_000002_create_webhooks_table;
mod m20260107_000003_create_feature_flags_table;
mod m20260107_000004_create_scheduled_tasks_table;
mod m20260107_000005_create_notifications_table;

// 課金・価格ベンチマーク
mod m20260108_000001_create_billing_tables;
mod m20260108_000002_create_pricing_benchmarks_table;

// 施設管理（FM）
mod m20260109_000001_create_fm_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            // 1. 基本テーブル作成（依存関係なし）
            Box::new(m20260105_000001_create_organizations_table::Migration),
            Box::new(m20260105_000002_create_roles_table::Migration),
            // 2. organizations / roles に依存
            Box::new(m20260105_000003_create_users_table::Migration),
            Box::new(m20260106_000001_create_audit_logs_table::Migration),
            Box::new(m20260107_000001_create_platform_settings_tables::Migration),
            Box::new(m20260107_000002_create_webhooks_table::Migration),
            Box::new(m20260107_000003_create_feature_flags_table::Migration),
            Box::new(m20260107_000004_create_scheduled_tasks_table::Migration),
            Box::new(m20260107_000005_create_notifications_table::Migration),
            Box::new(m20260108_000001_create_billing_tables::Migration),
            Box::new(m20260108_000002_create_pricing_benchmarks_table::Migration),
            // 3. vendors → work_orders の順で作成
            Box::new(m20260109_000001_create_fm_tables::Migration),
        ]
    }
}
