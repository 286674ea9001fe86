// src/service/mod.rs
pub mod audit_log_service;
pub mod auth_service;
pub mod benchmark_service;
pub mod billing_service;
pub mod bootstrap_service;
pub mod feature_flag_service;
pub mod notification_service;
pub mod organization_service;
pub mod role_service;
pub mod scheduled_task_service;
pub mod settings_service;
pub mod user_service;
pub mod vendor_service;
pub mod webhook_service;
pub mod work_order_service;
