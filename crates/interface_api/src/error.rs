//! API error handling
//!
//! Every failure leaves a handler as an [`ApiError`], rendered as
//! `{"message": ..., "errors"?: {field: [messages]}}`.

use axum::{
    extract::rejection::{FormRejection, JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use domain_mailchimp::{MemberError, ValidationResult};

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    MethodNotAllowed(String),

    #[error("{message}")]
    Validation {
        message: String,
        errors: ValidationResult,
    },

    /// MailChimp refused or failed the call
    #[error("{0}")]
    Remote(String),

    #[error("{0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationResult>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::Validation { .. } | ApiError::Remote(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation { message, errors } => ErrorResponse {
                message,
                errors: Some(errors),
            },
            other => ErrorResponse {
                message: other.to_string(),
                errors: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<MemberError> for ApiError {
    fn from(err: MemberError) -> Self {
        match err {
            MemberError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            MemberError::ValidationFailed { errors } => ApiError::Validation {
                message: "Invalid data given".to_string(),
                errors,
            },
            MemberError::Remote { message, .. } => ApiError::Remote(message),
            MemberError::Storage(source) => {
                error!(error = %source, "Member storage failed");
                ApiError::Internal(format!("Storage error: {}", source))
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::PortError;

    #[test]
    fn test_member_errors_map_to_status_codes() {
        let cases = [
            (MemberError::not_found("MailChimpList", "1"), StatusCode::NOT_FOUND),
            (
                MemberError::validation(ValidationResult::ok()),
                StatusCode::BAD_REQUEST,
            ),
            (MemberError::remote_message("Member Exists"), StatusCode::BAD_REQUEST),
            (
                MemberError::Storage(PortError::connection("down")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status(), status);
        }
    }

    #[test]
    fn test_method_not_allowed_status() {
        let error = ApiError::MethodNotAllowed("DELETE is not supported here".to_string());
        assert_eq!(error.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn test_remote_message_is_passed_through() {
        let error = ApiError::from(MemberError::remote_message("Member Exists"));
        assert_eq!(error.to_string(), "Member Exists");
    }
}
