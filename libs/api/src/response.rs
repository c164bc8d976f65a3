use std::collections::HashMap;

use axum::{
    extract::rejection::JsonRejection, http::StatusCode,
    response::IntoResponse, Json,
};
use serde::Serialize;
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::service::ServiceError;
use crate::ApiError;

static ERROR_CODES: &str = include_str!("error-code.json");

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status_code, message) = match self {
            ApiError::ClientError(message) => {
                (StatusCode::BAD_REQUEST, message)
            }
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::UpstreamError(message) => {
                (StatusCode::BAD_GATEWAY, message)
            }
            ApiError::ServerError(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };
        (status_code, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Malformed, mistyped or non-JSON bodies are client errors like any other
/// validation failure.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(message = rejection.body_text().as_str(), "rejected json body");
        ApiError::ClientError(rejection.body_text())
    }
}

pub type ApiResponse<T> = Result<T, ApiError>;

pub trait IntoApiResponse<T> {
    fn into_response(self, error_code: &str) -> ApiResponse<T>;
}

/// Validation and not-found messages go to the caller as they are. Upstream
/// and internal failures are logged and replaced by the generic message
/// registered for `error_code`.
impl<T> IntoApiResponse<T> for Result<T, ServiceError> {
    fn into_response(self, error_code: &str) -> ApiResponse<T> {
        self.map_err(|e| match e {
            ServiceError::Validation(message) => {
                warn!(error_code = error_code, message = message.as_str());
                ApiError::ClientError(message)
            }
            ServiceError::NotFound(entity) => {
                ApiError::NotFound(format!("{} not found", capitalize(entity)))
            }
            ServiceError::Upstream(_) => {
                error!(error_code = error_code, "{:?}", e);
                ApiError::UpstreamError(message(error_code))
            }
            ServiceError::Internal(_) => {
                error!(error_code = error_code, "{:?}", e);
                ApiError::ServerError(message(error_code))
            }
        })
    }
}

fn message(error_code: &str) -> String {
    serde_json::from_str::<HashMap<String, String>>(ERROR_CODES)
        .ok()
        .and_then(|mut errors| errors.remove(error_code))
        .unwrap_or_else(|| "Internal server error".to_string())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_every_error_code_has_a_message() {
        let errors =
            serde_json::from_str::<HashMap<String, String>>(ERROR_CODES)
                .unwrap();

        assert!(!errors.is_empty());
        assert!(errors.values().all(|message| !message.is_empty()));
        assert_eq!(message("500-007"), "Failed to create block");
        assert_eq!(message("unknown"), "Internal server error");
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let result: Result<(), ServiceError> = Err(ServiceError::Internal(
            "in sea-orm crate: connection refused".to_string(),
        ));

        let Err(ApiError::ServerError(message)) =
            result.into_response("500-006")
        else {
            panic!("expected a server error");
        };

        assert_eq!(message, "Failed to fetch block");
    }

    #[test]
    fn test_not_found_names_the_entity() {
        let result: Result<(), ServiceError> =
            Err(ServiceError::NotFound("block"));

        let Err(ApiError::NotFound(message)) = result.into_response("500-006")
        else {
            panic!("expected not found");
        };

        assert_eq!(message, "Block not found");
    }
}
