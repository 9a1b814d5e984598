//! Mapping of domain errors onto HTTP responses.
//!
//! Every error body is `{"message": "..."}`. Internal failures are logged here
//! and reach the client only as a generic message.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use evbook_core::identity::AuthError;
use evbook_core::lifecycle::LifecycleError;
use evbook_sdk::objects::{EventStatus, MessageResponse};

/// Errors that can occur in API handlers.
#[derive(Debug)]
pub(crate) enum ApiError {
    /// Malformed or missing request fields.
    Validation(String),
    /// Bad credentials, or a missing/invalid token.
    Unauthorized(&'static str),
    /// Authenticated, but not allowed to act on the resource.
    Forbidden,
    NotFound,
    AlreadyFinalized(EventStatus),
    /// Storage or hashing failure.
    Internal(String),
}

impl ApiError {
    pub(crate) fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::AlreadyFinalized(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::Unauthorized("invalid credentials"),
            AuthError::Unauthorized => ApiError::Unauthorized("unauthorized"),
            AuthError::Hashing(_) | AuthError::Signing(_) | AuthError::Store(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<LifecycleError> for ApiError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::NotFound => ApiError::NotFound,
            LifecycleError::Forbidden => ApiError::Forbidden,
            LifecycleError::AlreadyFinalized(status) => ApiError::AlreadyFinalized(status),
            LifecycleError::InvalidProposal(reason) => ApiError::Validation(reason),
            LifecycleError::Store(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Validation(reason) => format!("invalid input: {reason}"),
            ApiError::Unauthorized(message) => message.to_string(),
            ApiError::Forbidden => "not permitted to act on this event".to_string(),
            ApiError::NotFound => "event not found".to_string(),
            ApiError::AlreadyFinalized(status) => {
                format!("event already finalized as {status:?}")
            }
            ApiError::Internal(e) => {
                tracing::error!(error = %e, "API internal error");
                "internal server error".to_string()
            }
        };
        (status, Json(MessageResponse::new(message))).into_response()
    }
}
