// src/extractors/mod.rs
pub mod audit_actor;
pub mod json;
pub mod query;
pub mod tenant;
pub mod uuid;

pub use self::json::ValidatedJson;
pub use self::query::ApiQuery;
pub use self::uuid::ValidatedUuid;
