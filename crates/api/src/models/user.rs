//! User domain type.

use chrono::{DateTime, Utc};

use paperback_core::{Email, UserId, Username};

/// A registered user.
///
/// The password digest is deliberately not part of this type; it only ever
/// travels alongside a `User` through [`crate::db::Store::user_credentials`].
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID, assigned by the store.
    pub id: UserId,
    /// Display name, unique case-insensitively.
    pub username: Username,
    /// Email address, unique case-insensitively.
    pub email: Email,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}
