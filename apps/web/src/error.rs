//! # API Error Type
//!
//! Unified error type for route handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in PicoFI                                 │
//! │                                                                         │
//! │  Handler: Result<Response, ApiError>                                    │
//! │         │                                                               │
//! │         ├─ ValidationError / CalcError ──► 400, message shown, info     │
//! │         │                                                               │
//! │         ├─ SessionError (store, serde) ──► 500, generic text, error     │
//! │         │                                                               │
//! │         └─ RenderError ──────────────────► 500, generic text, error     │
//! │                                                                         │
//! │  SessionError::Expired never gets here: the session layer mints a new   │
//! │  session instead.                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The conversions below do the logging, so each failure is logged once
//! with its full detail while the visitor only sees what they can act on.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use picofi_core::{CalcError, ValidationError};
use picofi_render::RenderError;
use picofi_session::SessionError;

/// Error returned from route handlers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Form input could not be read (400)
    ValidationError,

    /// Figures were read but make no sense together (400)
    CalculationError,

    /// Session storage failed (500)
    SessionError,

    /// A page could not be compiled or rendered (500)
    RenderError,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationError | ErrorCode::CalculationError => StatusCode::BAD_REQUEST,
            ErrorCode::SessionError | ErrorCode::RenderError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }
}

/// Converts form validation errors to API errors.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        tracing::info!(error = %err, "rejected form input");
        ApiError::validation(err.to_string())
    }
}

/// Converts calculator errors to API errors.
impl From<CalcError> for ApiError {
    fn from(err: CalcError) -> Self {
        tracing::info!(error = %err, "rejected figures");
        ApiError::new(ErrorCode::CalculationError, err.to_string())
    }
}

/// Converts session store errors to API errors.
impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Expired(id) => {
                // Only reachable if a caller skipped the session layer
                tracing::warn!(session_id = %id, "expired session reached an error response");
                ApiError::new(ErrorCode::SessionError, "Session expired, please reload")
            }
            SessionError::Serialization(e) => {
                tracing::error!("Session data could not be (de)serialized: {}", e);
                ApiError::new(ErrorCode::SessionError, "Session data could not be read")
            }
            SessionError::Store(e) => {
                tracing::error!("Session store failed: {}", e);
                ApiError::new(ErrorCode::SessionError, "Session storage failed")
            }
        }
    }
}

/// Converts template errors to API errors.
impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        tracing::error!(error = %err, "page could not be rendered");
        ApiError::new(ErrorCode::RenderError, "Page could not be rendered")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status();
        let reason = status.canonical_reason().unwrap_or("Error");
        (status, format!("{} {}: {}", status.as_u16(), reason, self.message)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use picofi_render::{CompileError, RenderError};
    use picofi_session::{SessionId, StoreError};

    #[test]
    fn test_client_errors_keep_their_message() {
        let err: ApiError = CalcError::NegativeIncome.into();
        assert_eq!(err.code, ErrorCode::CalculationError);
        assert_eq!(err.code.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "income can't be negative, don't include debt here");

        let err: ApiError = ValidationError::Required {
            field: "income".to_string(),
        }
        .into();
        assert_eq!(err.code.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "income is required");
    }

    #[test]
    fn test_server_errors_hide_detail() {
        let err: ApiError = SessionError::Store(StoreError::Unavailable("redis down".into())).into();
        assert_eq!(err.code.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("redis"));

        let err: ApiError = RenderError::Compile {
            name: "simulation".to_string(),
            source: CompileError::MissingSlot,
        }
        .into();
        assert_eq!(err.code, ErrorCode::RenderError);
        assert!(!err.message.contains("slot"));

        let err: ApiError = SessionError::Expired(SessionId::from("abc")).into();
        assert_eq!(err.code.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_serializes_code() {
        let json = serde_json::to_value(ApiError::validation("bad")).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "bad");
    }

    #[tokio::test]
    async fn test_response_status_and_body() {
        let response = ApiError::validation("income is required").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"400 Bad Request: income is required");
    }
}
