// src/repository/mod.rs
pub mod audit_log_repository;
pub mod benchmark_repository;
pub mod billing_repository;
pub mod feature_flag_repository;
pub mod notification_repository;
pub mod organization_repository;
pub mod role_repository;
pub mod scheduled_task_repository;
pub mod settings_repository;
pub mod tenant_scope;
pub mod user_repository;
pub mod vendor_repository;
pub mod webhook_repository;
pub mod work_order_repository;
