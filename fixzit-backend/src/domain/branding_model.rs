// src/domain/branding_model.rs
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// ブランディングは常に id = 1 の1行
pub const BRANDING_ROW_ID: i32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "branding_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[serde(skip_serializing)]
    pub id: i32,
    pub company_name: String,
    pub logo_url: Option<String>,
    pub favicon_url: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub support_email: Option<String>,
    pub updated_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 未設定時の既定値
    pub fn platform_default() -> Self {
        Self {
            id: BRANDING_ROW_ID,
            company_name: "Fixzit".to_string(),
            logo_url: None,
            favicon_url: None,
            primary_color: "#0061a8".to_string(),
            secondary_color: "#00a859".to_string(),
            support_email: None,
            updated_by: None,
            updated_at: Utc::now(),
        }
    }
}
