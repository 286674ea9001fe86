// src/api/dto/organization_dto.rs
use crate::domain::organization_model::Model as OrganizationModel;
use crate::types::PaginationQuery;
use crate::utils::validation::validate_slug;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrganizationRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,

    #[validate(custom(function = validate_slug))]
    pub code: String,

    pub status: Option<String>,

    #[validate(email(message = "Invalid contact email"))]
    pub contact_email: Option<String>,

    #[validate(length(max = 100, message = "Country must be 100 characters or less"))]
    pub country: Option<String>,

    #[validate(range(min = 1, max = 100000, message = "max_users must be between 1 and 100000"))]
    pub max_users: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateOrganizationRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: Option<String>,

    pub status: Option<String>,

    #[validate(email(message = "Invalid contact email"))]
    pub contact_email: Option<String>,

    #[validate(length(max = 100, message = "Country must be 100 characters or less"))]
    pub country: Option<String>,

    #[validate(range(min = 1, max = 100000, message = "max_users must be between 1 and 100000"))]
    pub max_users: Option<i32>,
}

impl UpdateOrganizationRequest {
    pub fn has_updates(&self) -> bool {
        self.name.is_some()
            || self.status.is_some()
            || self.contact_email.is_some()
            || self.country.is_some()
            || self.max_users.is_some()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrganizationListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl OrganizationListQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationResponse {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub status: String,
    pub contact_email: Option<String>,
    pub country: Option<String>,
    pub max_users: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OrganizationModel> for OrganizationResponse {
    fn from(org: OrganizationModel) -> Self {
        Self {
            id: org.id,
            name: org.name,
            code: org.code,
            status: org.status,
            contact_email: org.contact_email,
            country: org.country,
            max_users: org.max_users,
            created_at: org.created_at,
            updated_at: org.updated_at,
        }
    }
}
