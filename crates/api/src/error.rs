//! Unified error handling with Sentry integration.
//!
//! Provides a unified `ApiError` type that every resolver failure propagates
//! through. Errors surface to clients as GraphQL errors carrying a `code`
//! extension; server-class errors are captured to Sentry before the response
//! is built, with internal details redacted.
//!
//! The `code` values follow the platform's wire taxonomy:
//! validation failures "404", unauthenticated/not-owner "403", conflicts and
//! invalid credentials "401", a missing review "404", an unknown login email
//! "403", internal failures "500".

use async_graphql::ErrorExtensions;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required argument is missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// The caller is not authenticated, or is not the owner of the targeted
    /// row.
    #[error("{0}")]
    Unauthorized(String),

    /// No user is registered under the supplied login email.
    #[error("user with given email not found")]
    EmailNotFound,

    /// The targeted review does not exist.
    #[error("review not found")]
    ReviewNotFound,

    /// Username or email already taken at registration.
    #[error("user with given email or username already exists")]
    DuplicateUser,

    /// Wrong password for an existing user.
    #[error("invalid password")]
    InvalidCredentials,

    /// Database operation failed.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// The wire-format error code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) | Self::ReviewNotFound => "404",
            Self::Unauthorized(_) | Self::EmailNotFound => "403",
            Self::DuplicateUser | Self::InvalidCredentials => "401",
            Self::Repository(_) | Self::Internal(_) => "500",
        }
    }

    /// Whether this error is a server fault worth capturing.
    const fn is_server_error(&self) -> bool {
        matches!(self, Self::Repository(_) | Self::Internal(_))
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = if self.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        async_graphql::Error::new(message).extend_with(|_, e| e.set("code", self.code()))
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidUsername(e) => Self::Validation(e.to_string()),
            AuthError::InvalidEmail(e) => Self::Validation(e.to_string()),
            AuthError::EmptyPassword => Self::Validation("password is mandatory".to_string()),
            AuthError::InvalidCredentials => Self::InvalidCredentials,
            AuthError::UserNotFound => Self::EmailNotFound,
            AuthError::UserAlreadyExists => Self::DuplicateUser,
            AuthError::PasswordHash => Self::Internal("password hashing failed".to_string()),
            AuthError::Token(e) => Self::Internal(e.to_string()),
            AuthError::Repository(e) => Self::Repository(e),
        }
    }
}
