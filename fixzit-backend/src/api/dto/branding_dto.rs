// src/api/dto/branding_dto.rs
use crate::api::dto::deserialize_nullable;
use crate::domain::branding_model::Model as BrandingModel;
use crate::utils::validation::{validate_hex_color, validate_http_url};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

/// ブランディングの部分更新。URL・メールは `null` で解除できる
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBrandingRequest {
    pub company_name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub logo_url: Option<Option<String>>,

    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub favicon_url: Option<Option<String>>,

    pub primary_color: Option<String>,

    pub secondary_color: Option<String>,

    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub support_email: Option<Option<String>>,
}

impl UpdateBrandingRequest {
    pub fn has_updates(&self) -> bool {
        self.company_name.is_some()
            || self.logo_url.is_some()
            || self.favicon_url.is_some()
            || self.primary_color.is_some()
            || self.secondary_color.is_some()
            || self.support_email.is_some()
    }
}

// Option<Option<_>> はderiveで扱いにくいため手書きで検証する
impl Validate for UpdateBrandingRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(name) = &self.company_name {
            let len = name.trim().chars().count();
            if !(1..=100).contains(&len) {
                let mut error = ValidationError::new("length");
                error.message = Some("Company name must be between 1 and 100 characters".into());
                errors.add("company_name", error);
            }
        }
        for (field, value) in [
            ("logo_url", &self.logo_url),
            ("favicon_url", &self.favicon_url),
        ] {
            if let Some(Some(url)) = value {
                if let Err(error) = validate_http_url(url) {
                    errors.add(field, error);
                }
            }
        }
        for (field, value) in [
            ("primary_color", &self.primary_color),
            ("secondary_color", &self.secondary_color),
        ] {
            if let Some(color) = value {
                if let Err(error) = validate_hex_color(color) {
                    errors.add(field, error);
                }
            }
        }
        if let Some(Some(email)) = &self.support_email {
            if !email.validate_email() {
                let mut error = ValidationError::new("email");
                error.message = Some("Invalid support email".into());
                errors.add("support_email", error);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandingResponse {
    pub company_name: String,
    pub logo_url: Option<String>,
    pub favicon_url: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub support_email: Option<String>,
    pub updated_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

impl From<BrandingModel> for BrandingResponse {
    fn from(branding: BrandingModel) -> Self {
        Self {
            company_name: branding.company_name,
            logo_url: branding.logo_url,
            favicon_url: branding.favicon_url,
            primary_color: branding.primary_color,
            secondary_color: branding.secondary_color,
            support_email: branding.support_email,
            updated_by: branding.updated_by,
            updated_at: branding.updated_at,
        }
    }
}

/// ログイン画面向けの公開情報（更新者は含めない）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicBrandingResponse {
    pub company_name: String,
    pub logo_url: Option<String>,
    pub favicon_url: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub support_email: Option<String>,
}

impl From<BrandingModel> for PublicBrandingResponse {
    fn from(branding: BrandingModel) -> Self {
        Self {
            company_name: branding.company_name,
            logo_url: branding.logo_url,
            favicon_url: branding.favicon_url,
            primary_color: branding.primary_color,
            secondary_color: branding.secondary_color,
            support_email: branding.support_email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branding_validation() {
        let ok = UpdateBrandingRequest {
            primary_color: Some("#112233".to_string()),
            logo_url: Some(None),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let bad = UpdateBrandingRequest {
            primary_color: Some("blue".to_string()),
            support_email: Some(Some("nope".to_string())),
            ..Default::default()
        };
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("primary_color"));
        assert!(errors.field_errors().contains_key("support_email"));
    }
}
