//! GraphQL schema assembly.
//!
//! The schema is built once at startup and shared across requests. Per
//! request, the resolved [`Identity`] is injected into the request data so
//! resolvers can gate operations on authentication.

use std::sync::Arc;

use async_graphql::{EmptySubscription, ErrorExtensions, Schema};

use crate::db::{RepositoryError, Store};
use crate::error::ApiError;
use crate::middleware::Identity;
use crate::services::auth::AuthService;

pub mod mutation;
pub mod query;
pub mod types;

pub use mutation::MutationRoot;
pub use query::QueryRoot;

/// The executable schema for the book-review API.
pub type ApiSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema with its shared collaborators attached.
pub fn build_schema(store: Arc<dyn Store>, auth: AuthService) -> ApiSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(store)
        .data(auth)
        .finish()
}

/// The shared store handle attached to the schema.
fn store<'a>(ctx: &async_graphql::Context<'a>) -> async_graphql::Result<&'a Arc<dyn Store>> {
    ctx.data::<Arc<dyn Store>>()
}

/// The caller's identity for this request.
///
/// Requests executed without injected identity data (tests, introspection
/// tooling) count as anonymous.
fn identity(ctx: &async_graphql::Context<'_>) -> Identity {
    ctx.data_opt::<Identity>()
        .copied()
        .unwrap_or(Identity::Anonymous)
}

/// Wrap a store failure as an extended GraphQL error.
///
/// `ApiError::extend` redacts the internal detail and attaches the `code`
/// extension, so every repository failure must pass through here rather
/// than converting via `Display`.
fn db_err(e: RepositoryError) -> async_graphql::Error {
    ApiError::Repository(e).extend()
}

/// Parse a wire `ID` argument into a numeric row id.
///
/// # Errors
///
/// Returns a validation error naming `what` when the value is empty or not
/// a number.
fn parse_id(value: &str, what: &str) -> async_graphql::Result<i32> {
    if value.is_empty() {
        return Err(ApiError::Validation(format!("{what} is mandatory")).extend());
    }
    value
        .parse::<i32>()
        .map_err(|_| ApiError::Validation(format!("{what} must be a numeric id")).extend())
}
