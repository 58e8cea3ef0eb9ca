//! Bearer token issuance and verification.
//!
//! Tokens are HS256 JWTs embedding the user identifier and email, signed
//! with the process-wide secret and valid for a configured window (default
//! 48 hours). Expiry is validated with zero leeway so the window is exact.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use paperback_core::{Email, UserId};

/// Errors that can occur when issuing or verifying a token.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token could not be signed.
    #[error("token issuance failed")]
    Issue(#[source] jsonwebtoken::errors::Error),

    /// The token is expired, malformed, or carries a bad signature.
    #[error("token rejected")]
    Verify(#[source] jsonwebtoken::errors::Error),
}

/// Claims embedded in a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Identifier of the user the token was issued for.
    pub user_id: i32,
    /// Email of the user at issuance time.
    pub email: String,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// Signs and verifies bearer tokens with the process-wide secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenSigner {
    /// Create a signer from the configured secret and validity window.
    #[must_use]
    pub fn new(secret: &SecretString, ttl_hours: i64) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Issue a signed token for a user, valid from now for the configured
    /// window.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Issue` if signing fails.
    pub fn issue(&self, user_id: UserId, email: &Email) -> Result<String, TokenError> {
        self.issue_at(Utc::now().timestamp(), user_id, email)
    }

    fn issue_at(&self, iat: i64, user_id: UserId, email: &Email) -> Result<String, TokenError> {
        let claims = Claims {
            user_id: user_id.as_i32(),
            email: email.as_str().to_owned(),
            iat,
            exp: iat + self.ttl.num_seconds(),
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
            .map_err(TokenError::Issue)
    }

    /// Verify a token's signature and expiry and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Verify` for an expired, malformed, or tampered
    /// token.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(TokenError::Verify)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new(&SecretString::from("kR9!vQ2#mX7$wL4@nZ8%bT1^cJ5&fH3*"), 48)
    }

    fn email() -> Email {
        Email::parse("alice@example.com").unwrap()
    }

    #[test]
    fn test_issue_then_verify_roundtrips_claims() {
        let signer = signer();
        let token = signer.issue(UserId::new(7), &email()).unwrap();

        let claims = signer.verify(&token).unwrap();
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.exp - claims.iat, 48 * 3600);
    }

    #[test]
    fn test_token_valid_inside_window_expired_outside() {
        let signer = signer();
        let now = Utc::now().timestamp();

        // Issued just under 48h ago: still valid
        let fresh = signer
            .issue_at(now - 48 * 3600 + 30, UserId::new(1), &email())
            .unwrap();
        assert!(signer.verify(&fresh).is_ok());

        // Issued just over 48h ago: expired
        let stale = signer
            .issue_at(now - 48 * 3600 - 30, UserId::new(1), &email())
            .unwrap();
        assert!(matches!(signer.verify(&stale), Err(TokenError::Verify(_))));
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let signer = signer();
        let token = signer.issue(UserId::new(1), &email()).unwrap();

        // Flip the final signature character
        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        assert!(signer.verify(&tampered).is_err());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = signer().issue(UserId::new(1), &email()).unwrap();

        let other = TokenSigner::new(&SecretString::from("zW6@pN3$qopY8#vD1!hK5^mR9&xB4*tF2"), 48);
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(signer().verify("not-a-token").is_err());
    }
}
