//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::token::TokenError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid username format.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] paperback_core::UsernameError),

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] paperback_core::EmailError),

    /// Password argument missing or empty.
    #[error("password is mandatory")]
    EmptyPassword,

    /// Wrong password for an existing user.
    #[error("invalid password")]
    InvalidCredentials,

    /// No user registered under the given email.
    #[error("user with given email not found")]
    UserNotFound,

    /// Username or email already taken.
    #[error("user with given email or username already exists")]
    UserAlreadyExists,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Token issuance error.
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
