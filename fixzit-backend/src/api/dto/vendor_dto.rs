// src/api/dto/vendor_dto.rs
use crate::domain::vendor_model::Model as VendorModel;
use crate::types::PaginationQuery;
use crate::utils::validation::validate_phone;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVendorRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,

    #[validate(length(max = 200, message = "Company must be 200 characters or less"))]
    pub company: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(custom(function = validate_phone))]
    pub phone: Option<String>,

    #[validate(length(max = 100, message = "Specialization must be 100 characters or less"))]
    pub specialization: Option<String>,

    #[validate(range(min = 0.0, max = 5.0, message = "rating must be between 0 and 5"))]
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateVendorRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 200, message = "Company must be 200 characters or less"))]
    pub company: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(custom(function = validate_phone))]
    pub phone: Option<String>,

    #[validate(length(max = 100, message = "Specialization must be 100 characters or less"))]
    pub specialization: Option<String>,

    #[validate(range(min = 0.0, max = 5.0, message = "rating must be between 0 and 5"))]
    pub rating: Option<f64>,

    pub is_active: Option<bool>,
}

impl UpdateVendorRequest {
    pub fn has_updates(&self) -> bool {
        self.name.is_some()
            || self.company.is_some()
            || self.email.is_some()
            || self.phone.is_some()
            || self.specialization.is_some()
            || self.rating.is_some()
            || self.is_active.is_some()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VendorListQuery {
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl VendorListQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorResponse {
    pub id: Uuid,
    pub org_id: Uuid,
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub specialization: Option<String>,
    pub rating: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VendorModel> for VendorResponse {
    fn from(vendor: VendorModel) -> Self {
        Self {
            id: vendor.id,
            org_id: vendor.org_id,
            name: vendor.name,
            company: vendor.company,
            email: vendor.email,
            phone: vendor.phone,
            specialization: vendor.specialization,
            rating: vendor.rating,
            is_active: vendor.is_active,
            created_at: vendor.created_at,
            updated_at: vendor.updated_at,
        }
    }
}
