use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{db::StoreError, models::envelope::Envelope};

/// Coarse classification clients see only through the status code and message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Auth,
    NotFound,
    Upstream,
    Internal,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid token")]
    InvalidToken,

    /// Role or ownership mismatch for an otherwise valid caller.
    #[error("{0}")]
    Permission(String),

    #[error("{0}")]
    NotFound(String),

    /// A downstream service answered with a non-accepted status.
    #[error("{message}")]
    Relayed { status: StatusCode, message: String },

    /// A downstream hop failed in transport or returned an undecodable body.
    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn permission(msg: impl Into<String>) -> Self {
        AppError::Permission(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::Store(StoreError::Conflict(_)) => ErrorKind::Validation,
            AppError::InvalidCredentials | AppError::InvalidToken | AppError::Permission(_) => {
                ErrorKind::Auth
            }
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Relayed { .. } | AppError::Upstream(_) => ErrorKind::Upstream,
            AppError::Store(_) | AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::InvalidCredentials
            | AppError::Permission(_)
            | AppError::Store(StoreError::Conflict(_)) => StatusCode::BAD_REQUEST,
            AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Relayed { status, .. } => *status,
            AppError::Upstream(_) | AppError::Store(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message placed in the response envelope; internal details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            AppError::Store(StoreError::Conflict(msg)) => msg.clone(),
            AppError::Upstream(_) | AppError::Store(_) | AppError::Internal(_) => {
                "internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Upstream(detail) => tracing::error!("Downstream call failed: {}", detail),
            AppError::Store(StoreError::Conflict(_)) => {}
            AppError::Store(e) => tracing::error!("Store error: {}", e),
            AppError::Internal(e) => tracing::error!("Internal error: {}", e),
            _ => {}
        }
        let status = self.status();
        let body = Envelope::<()>::failure(self.public_message());
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_taxonomy() {
        assert_eq!(AppError::validation("bad").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidCredentials.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::not_found("car not found").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Upstream("connection refused".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Relayed {
                status: StatusCode::UNAUTHORIZED,
                message: "invalid token".into()
            }
            .status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_internal_details_are_not_exposed() {
        let err = AppError::Upstream("dns failure for car-service".into());
        assert_eq!(err.public_message(), "internal server error");
        assert_eq!(err.kind(), ErrorKind::Upstream);
    }

    #[test]
    fn test_store_conflict_is_a_validation_error() {
        let err = AppError::from(StoreError::Conflict("email already exists".into()));
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "email already exists");
    }
}
