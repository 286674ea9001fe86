// src/extractors/json.rs
use crate::error::AppError;
use crate::utils::error_helper::convert_validation_errors;
use axum::extract::{rejection::JsonRejection, FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use tracing::warn;
use validator::Validate;

/// JSONボディをデシリアライズしてからvalidatorで検証する
///
/// 壊れたJSONや型違いは `bad_request`、検証エラーは `validation_errors` になる。
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let path = req.uri().path().to_string();
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| reject_json(&path, rejection))?;

        value
            .validate()
            .map_err(|errors| convert_validation_errors(errors, &path))?;

        Ok(ValidatedJson(value))
    }
}

fn reject_json(path: &str, rejection: JsonRejection) -> AppError {
    warn!(path = %path, error = %rejection.body_text(), "Rejected request body");
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            AppError::BadRequest("Expected request with `Content-Type: application/json`".to_string())
        }
        other => AppError::BadRequest(format!("Invalid JSON body: {}", other.body_text())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request as HttpRequest};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
    }

    fn json_request(body: &'static str) -> Request {
        HttpRequest::builder()
            .method("POST")
            .uri("/test")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let result = ValidatedJson::<Payload>::from_request(json_request("{\"name\":"), &()).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_validation_failure_names_field() {
        let result = ValidatedJson::<Payload>::from_request(json_request("{\"name\":\"\"}"), &()).await;
        match result {
            Err(AppError::ValidationErrors(errors)) => {
                assert_eq!(errors, vec!["name: Name is required".to_string()]);
            }
            other => panic!("unexpected result: {:?}", other.map(|v| v.0)),
        }
    }

    #[tokio::test]
    async fn test_valid_payload() {
        let ValidatedJson(payload) =
            ValidatedJson::<Payload>::from_request(json_request("{\"name\":\"pump\"}"), &())
                .await
                .unwrap();
        assert_eq!(payload.name, "pump");
    }
}
