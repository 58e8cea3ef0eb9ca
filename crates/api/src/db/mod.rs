//! Persistence collaborator for the book-review store.
//!
//! # Tables
//!
//! - `users` - registration records with password digests
//! - `books` - the shared catalogue
//! - `reviews` - per-user reviews with an immutable owner column
//!
//! The [`Store`] trait is the seam between the resolver layer and the
//! relational store; [`postgres::PgStore`] is the production implementation
//! and `memory::MemStore` (behind the `test-support` feature) backs the
//! integration tests.
//!
//! # Migrations
//!
//! Migrations live in `crates/api/migrations/` and run at startup via
//! `sqlx::migrate!`.

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod postgres;
mod store;

pub use store::Store;

/// Errors that can occur during repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
