//! Application error type mapping to HTTP status codes and the error body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use supportdesk_types::error::{ChatError, RepositoryError, TicketError};
use supportdesk_types::llm::LlmError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Chat turn failures (LLM or memory).
    Chat(ChatError),
    /// Ticket storage errors.
    Ticket(TicketError),
    /// Memory storage errors.
    Memory(RepositoryError),
    /// Validation error.
    Validation(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<TicketError> for AppError {
    fn from(e: TicketError) -> Self {
        AppError::Ticket(e)
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        AppError::Memory(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Chat(ChatError::Llm(LlmError::AuthenticationFailed)) => (
                StatusCode::BAD_GATEWAY,
                "LLM_AUTH_FAILED",
                "The support agent rejected our credentials".to_string(),
            ),
            AppError::Chat(ChatError::Llm(e @ LlmError::RateLimited { .. })) => {
                (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED", e.to_string())
            }
            AppError::Chat(ChatError::Llm(e)) => (StatusCode::BAD_GATEWAY, "LLM_ERROR", e.to_string()),
            AppError::Chat(ChatError::Memory(e)) | AppError::Memory(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", e.to_string())
            }
            AppError::Ticket(e) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::error!(code, "{message}");
        } else {
            tracing::debug!(code, "{message}");
        }

        let body = json!({
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
