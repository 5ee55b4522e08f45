//! API error types and handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use stegward::StegwardError;

/// API error type.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from client.
    BadRequest(String),
    /// Missing or invalid credentials.
    Unauthorized(String),
    /// Approval refused by the steganalysis gate; carries the report.
    PolicyRejected(String),
    /// Conflict (e.g., artifact already decided).
    Conflict(String),
    /// Detector tool not available.
    Unavailable(String),
    /// Internal server error.
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message, report) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::PolicyRejected(report) => (
                StatusCode::FORBIDDEN,
                "policy_rejected",
                "approval refused: steganalysis flagged this image".to_string(),
                Some(report),
            ),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, "unavailable", msg, None),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg, None),
        };

        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
                report,
            }),
        )
            .into_response()
    }
}

impl From<StegwardError> for ApiError {
    fn from(err: StegwardError) -> Self {
        match err {
            StegwardError::InvalidInput(msg) => ApiError::BadRequest(msg),
            StegwardError::CorruptArtifact(msg) => ApiError::BadRequest(msg),
            StegwardError::NotFound(id) => ApiError::NotFound(format!("artifact not found: {id}")),
            StegwardError::PolicyRejected { report } => ApiError::PolicyRejected(report),
            StegwardError::AlreadyDecided(msg) => ApiError::Conflict(msg),
            StegwardError::ToolUnavailable(msg) => ApiError::Unavailable(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::PolicyRejected(report) => write!(f, "Policy rejected: {}", report),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Unavailable(msg) => write!(f, "Unavailable: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}
