//! Authentication and authorization failures.

use crate::envelope::error_response;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Every way the auth gate or a role guard can reject a request.
///
/// All variants are terminal for the request.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No token provided")]
    NoCredential,
    #[error("Token has expired")]
    ExpiredCredential,
    #[error("Invalid token")]
    InvalidCredential,
    #[error("Invalid role in token")]
    UnknownRole,
    #[error("User not found")]
    RecordNotFound,
    #[error("Account is inactive")]
    RecordInactive,
    #[error("Authentication required")]
    Unauthenticated,
    #[error("Insufficient permissions")]
    Forbidden,
    #[error("Authentication failed")]
    Internal(#[source] anyhow::Error),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::NoCredential => "NO_TOKEN",
            AuthError::ExpiredCredential => "TOKEN_EXPIRED",
            AuthError::InvalidCredential => "INVALID_TOKEN",
            AuthError::UnknownRole => "INVALID_ROLE",
            AuthError::RecordNotFound => "USER_NOT_FOUND",
            AuthError::RecordInactive => "ACCOUNT_INACTIVE",
            AuthError::Unauthenticated => "AUTH_REQUIRED",
            AuthError::Forbidden => "FORBIDDEN",
            AuthError::Internal(_) => "AUTH_ERROR",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::Internal(err) = &self {
            error!(error = ?err, "auth pipeline failed");
        }
        // Display never includes the internal source.
        error_response(self.status(), self.code(), self.to_string())
    }
}
