//! Authentication extractors.
//!
//! Resolves the caller's identity from the `Authorization` header before the
//! request reaches a resolver. An absent, malformed, or expired token never
//! rejects the request here; the caller is simply anonymous, and each
//! operation decides for itself whether anonymous access is allowed.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use paperback_core::types::UserId;

use crate::services::auth::TokenSigner;
use crate::state::AppState;

/// The resolved identity of a request.
///
/// Every request carries exactly one of these. There is no "maybe" state:
/// a token that fails verification for any reason collapses to `Anonymous`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    /// No token, or a token that did not verify.
    Anonymous,
    /// A verified token for this user.
    User(UserId),
}

impl Identity {
    /// Resolve an identity from a raw `Authorization` header value.
    ///
    /// Accepts both a bare token and the `Bearer <token>` form; the scheme
    /// is matched case-insensitively.
    #[must_use]
    pub fn from_header(raw: Option<&str>, signer: &TokenSigner) -> Self {
        let Some(raw) = raw else {
            return Self::Anonymous;
        };

        let token = match raw.split_once(' ') {
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest,
            _ => raw,
        };
        let token = token.trim();
        if token.is_empty() {
            return Self::Anonymous;
        }

        match signer.verify(token) {
            Ok(claims) => Self::User(UserId::new(claims.user_id)),
            Err(_) => Self::Anonymous,
        }
    }

    /// The user id if the caller is authenticated.
    #[must_use]
    pub const fn user_id(self) -> Option<UserId> {
        match self {
            Self::Anonymous => None,
            Self::User(id) => Some(id),
        }
    }
}

/// Extractor that resolves the caller's identity without rejecting.
///
/// Unauthenticated requests extract as `Identity::Anonymous`.
pub struct OptionalIdentity(pub Identity);

impl FromRequestParts<AppState> for OptionalIdentity {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        Ok(Self(Identity::from_header(raw, state.signer())))
    }
}
