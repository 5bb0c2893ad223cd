//! HTTP error response conversion
//!
//! This module provides HTTP-specific error response conversion for AppError.
//!
//! **Preferred handler pattern:** Return `Result<impl IntoResponse, HttpAppError>`.
//! Use `AppError` for errors so they convert via `?` and render consistently
//! (status, body, logging).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cliphost_core::{AppError, ErrorMetadata, LogLevel};
use serde::Serialize;
use utoipa::ToSchema;

/// Standardized error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Client-facing message
    pub message: String,
    /// Detail chain, omitted in production and for sensitive errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether the request can be retried as-is
    pub recoverable: bool,
    /// Suggested action for the client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper for AppError that implements IntoResponse.
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(error: AppError) -> Self {
        Self(error)
    }
}

/// Log an error at the severity its metadata asks for.
fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Request failed")
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Request failed")
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Request failed")
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|v| v == "production")
        .unwrap_or(false)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let error = self.0;

        log_error(&error);

        let status = StatusCode::from_u16(error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Sensitive errors never ship their detail chain; production ships none.
        let hide_detail = is_production_env() || error.is_sensitive();
        let body = ErrorResponse {
            message: error.client_message(),
            error: if hide_detail {
                None
            } else {
                Some(error.detailed_message())
            },
            code: error.error_code().to_string(),
            recoverable: error.is_recoverable(),
            suggested_action: error.suggested_action().map(String::from),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_conversion_keeps_variant() {
        let http_error: HttpAppError =
            AppError::NotFound("Channel not found".to_string()).into();
        match http_error.0 {
            AppError::NotFound(msg) => assert_eq!(msg, "Channel not found"),
            _ => panic!("Expected NotFound variant"),
        }
    }

    #[test]
    fn test_validation_renders_400() {
        let response =
            HttpAppError(AppError::Validation("No Video Uploaded".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_conflict_renders_400() {
        let response = HttpAppError(AppError::Conflict(
            "Channel name already exists".to_string(),
        ))
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_authorization_renders_403() {
        let response = HttpAppError(AppError::Authorization(
            "You don't have a channel to edit".to_string(),
        ))
        .into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_upload_renders_500() {
        let response =
            HttpAppError(AppError::Upload("store rejected the file".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_body_omits_empty_fields() {
        let body = ErrorResponse {
            message: "Channel not found".to_string(),
            error: None,
            code: "NOT_FOUND".to_string(),
            recoverable: false,
            suggested_action: None,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["message"], "Channel not found");
        assert_eq!(json["code"], "NOT_FOUND");
        assert!(json.get("error").is_none());
        assert!(json.get("suggested_action").is_none());
    }

    #[test]
    fn test_error_body_carries_detail_when_present() {
        let body = ErrorResponse {
            message: "Invalid Channel ID".to_string(),
            error: Some("Invalid Channel ID".to_string()),
            code: "VALIDATION_ERROR".to_string(),
            recoverable: true,
            suggested_action: Some("Correct the request and retry".to_string()),
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"], "Invalid Channel ID");
        assert_eq!(json["recoverable"], true);
    }
}
