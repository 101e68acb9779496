use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use utoipa::ToSchema;

/// FieldError
///
/// A single field-level validation failure, serialized into the
/// `{errors: [{field, message}]}` payload that admin forms render inline.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for the most common case: a required field that is
    /// missing or blank.
    pub fn required(field: impl Into<String>) -> Self {
        let field = field.into();
        let message = format!("{} is required", field);
        Self { field, message }
    }
}

/// ApiError
///
/// The full error taxonomy of the API. Every handler returns
/// `Result<_, ApiError>`; the `IntoResponse` impl below maps each variant
/// to its status code and JSON body, so no handler builds error responses
/// by hand.
///
/// Clients only ever see `{message}` or `{errors: [...]}`. Upstream
/// failures (database, object storage) are logged with their detail and
/// collapsed into a generic 500.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed required fields. 400 with per-field messages.
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// A request that is structurally wrong in a non-field-specific way
    /// (no file in a multipart upload, wrong current password). 400 with
    /// a single message.
    #[error("{0}")]
    BadRequest(String),

    /// No active document, or no document by id. 404.
    #[error("{0}")]
    NotFound(String),

    /// Missing/invalid/expired token, or a deactivated account. 401.
    #[error("{0}")]
    Auth(String),

    /// Authenticated but the role is insufficient. 403.
    #[error("{0}")]
    Forbidden(String),

    /// Database or storage layer failure. 500, detail logged server-side.
    #[error("{0}")]
    Upstream(String),
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "errors": errors })),
            )
                .into_response(),
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "message": message })),
            )
                .into_response(),
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "message": message })),
            )
                .into_response(),
            ApiError::Auth(message) => (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({ "message": message })),
            )
                .into_response(),
            ApiError::Forbidden(message) => (
                StatusCode::FORBIDDEN,
                Json(serde_json::json!({ "message": message })),
            )
                .into_response(),
            ApiError::Upstream(detail) => {
                // The detail stays in the logs; clients get a generic body.
                tracing::error!("upstream error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({ "message": "Server error" })),
                )
                    .into_response()
            }
        }
    }
}
