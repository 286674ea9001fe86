// src/api/handlers/mod.rs
pub mod audit_log_handler;
pub mod auth_handler;
pub mod benchmark_handler;
pub mod billing_handler;
pub mod feature_flag_handler;
pub mod notification_handler;
pub mod organization_handler;
pub mod role_handler;
pub mod scheduled_task_handler;
pub mod settings_handler;
pub mod system_handler;
pub mod user_handler;
pub mod vendor_handler;
pub mod webhook_handler;
pub mod work_order_handler;
