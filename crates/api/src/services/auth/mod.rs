//! Credential service.
//!
//! Password digesting/verification and the register/login flows that turn a
//! user record into a signed bearer token.

mod error;
pub mod token;

pub use error::AuthError;
pub use token::{Claims, TokenSigner};

use std::sync::Arc;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use paperback_core::{Email, Username};

use crate::db::{RepositoryError, Store};
use crate::models::User;

/// Argon2 cost parameters, overridable from configuration.
///
/// `None` fields fall back to the argon2 crate defaults, which are tuned so
/// verification takes tens of milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordCost {
    /// Memory cost in KiB.
    pub m_cost: Option<u32>,
    /// Iteration count.
    pub t_cost: Option<u32>,
}

impl PasswordCost {
    /// Cheap parameters for tests, where digest strength is irrelevant.
    #[cfg(any(test, feature = "test-support"))]
    #[must_use]
    pub const fn fast() -> Self {
        Self {
            m_cost: Some(1024),
            t_cost: Some(1),
        }
    }

    fn params(self) -> Params {
        let defaults = Params::default();
        Params::new(
            self.m_cost.unwrap_or(defaults.m_cost()),
            self.t_cost.unwrap_or(defaults.t_cost()),
            defaults.p_cost(),
            None,
        )
        .unwrap_or_default()
    }
}

/// A signed token plus the user it was issued for.
///
/// Produced by register and login; never persisted.
#[derive(Debug, Clone)]
pub struct AuthPayload {
    /// Bearer token to present on subsequent requests.
    pub token: String,
    /// The authenticated user.
    pub user: User,
}

/// Authentication service.
///
/// Handles user registration and login against the store.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn Store>,
    signer: TokenSigner,
    cost: PasswordCost,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, signer: TokenSigner, cost: PasswordCost) -> Self {
        Self {
            store,
            signer,
            cost,
        }
    }

    /// Register a new user with username, email, and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` / `AuthError::InvalidEmail` /
    /// `AuthError::EmptyPassword` if an argument fails validation.
    /// Returns `AuthError::UserAlreadyExists` if the username or email is
    /// already registered (case-insensitively).
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthPayload, AuthError> {
        let username = Username::parse(username)?;
        let email = Email::parse(email)?;
        if password.is_empty() {
            return Err(AuthError::EmptyPassword);
        }

        // Pre-check for a friendlier error; the unique indexes still enforce
        // this under races.
        if self.store.user_exists(&username, &email).await? {
            return Err(AuthError::UserAlreadyExists);
        }

        let digest = self.digest_password(password.to_owned()).await?;

        let user = self
            .store
            .create_user(&username, &email, &digest)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        let token = self.signer.issue(user.id, &user.email)?;
        Ok(AuthPayload { token, user })
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if no user has that email.
    /// Returns `AuthError::InvalidCredentials` if the password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, AuthError> {
        let email = Email::parse(email)?;
        if password.is_empty() {
            return Err(AuthError::EmptyPassword);
        }

        let (user, digest) = self
            .store
            .user_credentials(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        // Verification is deliberately slow; keep it off the executor.
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || verify_password(&password, &digest))
            .await
            .map_err(|_| AuthError::PasswordHash)??;

        let token = self.signer.issue(user.id, &user.email)?;
        Ok(AuthPayload { token, user })
    }

    /// Digest a password for storage on a blocking thread.
    async fn digest_password(&self, password: String) -> Result<String, AuthError> {
        let params = self.cost.params();
        tokio::task::spawn_blocking(move || hash_password(&password, params))
            .await
            .map_err(|_| AuthError::PasswordHash)?
    }
}

/// Hash a password using Argon2id with a random per-call salt.
fn hash_password(password: &str, params: Params) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored digest.
///
/// Uses the salt and cost parameters embedded in the digest; a malformed
/// digest fails verification rather than erring separately.
fn verify_password(password: &str, digest: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(digest).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn fast_params() -> Params {
        PasswordCost::fast().params()
    }

    #[test]
    fn test_digests_differ_but_both_verify() {
        let first = hash_password("pw1", fast_params()).unwrap();
        let second = hash_password("pw1", fast_params()).unwrap();

        // Random salt per call
        assert_ne!(first, second);
        assert!(verify_password("pw1", &first).is_ok());
        assert!(verify_password("pw1", &second).is_ok());
    }

    #[test]
    fn test_wrong_password_fails_verification() {
        let digest = hash_password("pw1", fast_params()).unwrap();
        assert!(matches!(
            verify_password("pw2", &digest),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_malformed_digest_fails_cleanly() {
        assert!(matches!(
            verify_password("pw1", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_digest_is_not_the_plaintext() {
        let digest = hash_password("hunter2", fast_params()).unwrap();
        assert!(!digest.contains("hunter2"));
        assert!(digest.starts_with("$argon2id$"));
    }
}
