//! GraphQL object types.
//!
//! Thin wrappers around the domain models. Field resolvers expose scalar
//! columns directly; association fields go back through the store, so nested
//! selections always read current rows rather than a snapshot.

use async_graphql::{Context, ID, Object, Result};
use chrono::{DateTime, Utc};

use super::{db_err, store};
use crate::db::RepositoryError;
use crate::models;

/// A registered user.
///
/// The password digest never crosses this boundary.
pub struct User(pub models::User);

#[Object]
impl User {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn username(&self) -> &str {
        self.0.username.as_str()
    }

    async fn email(&self) -> &str {
        self.0.email.as_str()
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    /// Reviews written by this user, oldest first.
    async fn reviews(&self, ctx: &Context<'_>) -> Result<Vec<Review>> {
        let reviews = store(ctx)?
            .reviews_by_user(self.0.id, models::Page::default())
            .await
            .map_err(db_err)?;
        Ok(reviews.into_iter().map(Review).collect())
    }
}

/// A book in the catalogue.
pub struct Book(pub models::Book);

#[Object]
impl Book {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    async fn author(&self) -> &str {
        &self.0.author
    }

    async fn published_year(&self) -> i32 {
        self.0.published_year
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    /// Reviews of this book, oldest first.
    async fn reviews(&self, ctx: &Context<'_>) -> Result<Vec<Review>> {
        let reviews = store(ctx)?
            .reviews_for_book(self.0.id, models::Page::default())
            .await
            .map_err(db_err)?;
        Ok(reviews.into_iter().map(Review).collect())
    }
}

/// A review of a book by a user.
pub struct Review(pub models::Review);

#[Object]
impl Review {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn rating(&self) -> i32 {
        self.0.rating
    }

    async fn comment(&self) -> &str {
        &self.0.comment
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    /// The user who wrote this review.
    async fn user(&self, ctx: &Context<'_>) -> Result<User> {
        let user = store(ctx)?
            .user_by_id(self.0.user_id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| {
                db_err(RepositoryError::DataCorruption(format!(
                    "review {} references missing user {}",
                    self.0.id, self.0.user_id
                )))
            })?;
        Ok(User(user))
    }

    /// The book this review is about.
    async fn book(&self, ctx: &Context<'_>) -> Result<Book> {
        let book = store(ctx)?
            .book_by_id(self.0.book_id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| {
                db_err(RepositoryError::DataCorruption(format!(
                    "review {} references missing book {}",
                    self.0.id, self.0.book_id
                )))
            })?;
        Ok(Book(book))
    }
}

/// The result of a successful register or login.
pub struct AuthPayload(pub crate::services::auth::AuthPayload);

#[Object]
impl AuthPayload {
    /// Bearer token for subsequent requests.
    async fn token(&self) -> &str {
        &self.0.token
    }

    /// The authenticated user.
    async fn user(&self) -> User {
        User(self.0.user.clone())
    }
}
