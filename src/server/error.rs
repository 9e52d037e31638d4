use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::errors::{ChartError, ChatError, IngestError, ProjectError};

/// HTTP rendering of a domain error.
///
/// Every expected error maps to an unsuccessful response with a
/// human-readable message; none present as an unhandled failure. Client
/// errors use the `"fail"` envelope, server-side ones `"error"`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let envelope = if self.status.is_server_error() {
            "error"
        } else {
            "fail"
        };
        let body = Json(json!({
            "status": envelope,
            "message": self.message,
        }));
        (self.status, body).into_response()
    }
}

impl From<ProjectError> for ApiError {
    fn from(err: ProjectError) -> Self {
        match err {
            ProjectError::NotFound | ProjectError::ChartNotFound => {
                Self::new(StatusCode::NOT_FOUND, err.to_string())
            }
            ProjectError::Validation(message) => Self::bad_request(message),
            ProjectError::Ingest(err) => err.into(),
            ProjectError::Chart(err) => err.into(),
            ProjectError::Database(err) => {
                error!(error = %err, "database operation failed");
                Self::internal()
            }
        }
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::TooLarge { .. } => {
                Self::new(StatusCode::PAYLOAD_TOO_LARGE, err.to_string())
            }
            _ => Self::bad_request(err.to_string()),
        }
    }
}

impl From<ChartError> for ApiError {
    fn from(err: ChartError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            // Provider payloads are opaque; surface a generic fallback.
            ChatError::Upstream(_) => {
                error!(error = %err, "chat provider call failed");
                Self::new(StatusCode::BAD_GATEWAY, "failed to fetch AI response")
            }
            ChatError::MissingApiKey => {
                error!("chat requested but no provider API key is configured");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "the AI assistant is not configured on this deployment",
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let api: ApiError = ProjectError::NotFound.into();
        assert_eq!(api.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn oversized_upload_maps_to_413() {
        let api: ApiError = IngestError::TooLarge { size: 11, max: 4 }.into();
        assert_eq!(api.status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn upstream_chat_failure_is_a_bad_gateway_with_generic_message() {
        let api: ApiError = ChatError::Upstream("secret provider detail".to_string()).into();
        assert_eq!(api.status, StatusCode::BAD_GATEWAY);
        assert!(!api.message.contains("secret"));
    }
}
