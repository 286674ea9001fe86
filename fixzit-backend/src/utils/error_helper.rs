// src/utils/error_helper.rs

//! サービス層・ハンドラー層で共通のエラー生成ヘルパー

use crate::error::AppError;
use tracing::{error, warn};
use validator::ValidationErrors;

/// validatorのValidationErrorsを「field: message」形式のAppErrorに変換
pub fn convert_validation_errors(validation_errors: ValidationErrors, context: &str) -> AppError {
    warn!(
        context = %context,
        error_count = validation_errors.field_errors().len(),
        "Validation failed"
    );

    let mut errors: Vec<String> = validation_errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| format!("invalid value ({})", error.code), |cow| cow.to_string());
                format!("{}: {}", field, message)
            })
        })
        .collect();
    errors.sort();

    AppError::ValidationErrors(errors)
}

pub fn validation_error(field: &str, message: &str) -> AppError {
    AppError::ValidationError(format!("{}: {}", field, message))
}

/// 文字列を列挙型へ変換する。失敗時は「field: message」のバリデーションエラー
pub fn parse_field<T>(field: &str, value: &str) -> Result<T, AppError>
where
    T: std::str::FromStr<Err = String>,
{
    value
        .parse::<T>()
        .map_err(|message| validation_error(field, &message))
}

/// 内部サーバーエラーをログ付きで生成（詳細はクライアントへ返さない）
pub fn internal_server_error<E: std::fmt::Display>(
    error: E,
    context: &str,
    user_message: &str,
) -> AppError {
    error!(
        error = %error,
        context = %context,
        "Internal server error occurred"
    );
    AppError::InternalServerError(user_message.to_string())
}

/// 認証失敗。ログには詳細を残し、クライアントには汎用メッセージを返す
pub fn unauthorized_error(detail: &str, context: &str, user_message: &str) -> AppError {
    warn!(
        context = %context,
        detail = %detail,
        "Unauthorized request"
    );
    AppError::Unauthorized(user_message.to_string())
}

pub fn forbidden_error(message: &str, context: &str, user_id: Option<&str>) -> AppError {
    warn!(
        context = %context,
        message = %message,
        user_id = user_id.unwrap_or("unknown"),
        "Forbidden access attempt"
    );
    AppError::Forbidden(message.to_string())
}

pub fn not_found_error(resource: &str, identifier: &str, context: &str) -> AppError {
    warn!(
        context = %context,
        resource = %resource,
        identifier = %identifier,
        "Resource not found"
    );
    AppError::NotFound(format!("{} {} not found", resource, identifier))
}

pub fn conflict_error(message: &str, context: &str) -> AppError {
    warn!(
        context = %context,
        message = %message,
        "Resource conflict occurred"
    );
    AppError::Conflict(message.to_string())
}

/// 部分更新で変更項目が1つもなければ400
pub fn ensure_has_updates(has_updates: bool, context: &str) -> Result<(), AppError> {
    if has_updates {
        return Ok(());
    }
    warn!(context = %context, "Update request without any fields");
    Err(AppError::BadRequest(
        "At least one field must be provided for update".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 3, max = 10))]
        name: String,
        #[validate(email)]
        email: String,
    }

    #[test]
    fn test_convert_validation_errors_names_fields() {
        let sample = Sample {
            name: "ab".to_string(),
            email: "invalid-email".to_string(),
        };

        match convert_validation_errors(sample.validate().unwrap_err(), "test") {
            AppError::ValidationErrors(errors) => {
                assert!(errors.iter().any(|e| e.starts_with("name:")));
                assert!(errors.iter().any(|e| e.starts_with("email:")));
            }
            other => panic!("Expected ValidationErrors, got {:?}", other),
        }
    }

    #[test]
    fn test_not_found_error_message() {
        match not_found_error("Vendor", "123", "vendor service") {
            AppError::NotFound(message) => assert_eq!(message, "Vendor 123 not found"),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }
}
