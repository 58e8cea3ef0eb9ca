//! Mutation resolvers.
//!
//! Argument validation runs before the authentication check in every
//! mutation, so a request that is both malformed and anonymous reports the
//! malformed argument.

use async_graphql::{Context, ErrorExtensions, ID, Object, Result};

use paperback_core::{BookId, ReviewId, UserId};

use super::types::{AuthPayload, Book, Review};
use super::{db_err, identity, parse_id, store};
use crate::error::ApiError;
use crate::models::{NewBook, NewReview, ReviewPatch};
use crate::services::auth::AuthService;

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Register a new user and sign them in.
    async fn register(
        &self,
        ctx: &Context<'_>,
        username: String,
        email: String,
        password: String,
    ) -> Result<AuthPayload> {
        let payload = ctx
            .data::<AuthService>()?
            .register(&username, &email, &password)
            .await
            .map_err(|e| ApiError::from(e).extend())?;
        Ok(AuthPayload(payload))
    }

    /// Sign in with email and password.
    async fn login(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
    ) -> Result<AuthPayload> {
        let payload = ctx
            .data::<AuthService>()?
            .login(&email, &password)
            .await
            .map_err(|e| ApiError::from(e).extend())?;
        Ok(AuthPayload(payload))
    }

    /// Add a book to the catalogue.
    async fn add_book(
        &self,
        ctx: &Context<'_>,
        title: String,
        author: String,
        published_year: i32,
    ) -> Result<Book> {
        if title.is_empty() {
            return Err(ApiError::Validation("title is mandatory".to_string()).extend());
        }
        if author.is_empty() {
            return Err(ApiError::Validation("author is mandatory".to_string()).extend());
        }
        if published_year == 0 {
            return Err(ApiError::Validation("published year is mandatory".to_string()).extend());
        }

        if identity(ctx).user_id().is_none() {
            return Err(ApiError::Unauthorized(
                "you are not authorized to add a book".to_string(),
            )
            .extend());
        }

        let book = store(ctx)?
            .create_book(NewBook {
                title,
                author,
                published_year,
            })
            .await
            .map_err(db_err)?;
        Ok(Book(book))
    }

    /// Add a review to a book, owned by the caller.
    async fn add_review(
        &self,
        ctx: &Context<'_>,
        book_id: ID,
        rating: i32,
        comment: String,
    ) -> Result<Review> {
        let book_id = parse_id(&book_id, "book id")?;
        if rating == 0 {
            return Err(ApiError::Validation("rating is mandatory".to_string()).extend());
        }
        if comment.is_empty() {
            return Err(ApiError::Validation("comment is mandatory".to_string()).extend());
        }

        let user_id = self.require_known_user(ctx, "add a review").await?;

        let review = store(ctx)?
            .create_review(NewReview {
                user_id,
                book_id: BookId::new(book_id),
                rating,
                comment,
            })
            .await
            .map_err(db_err)?;
        Ok(Review(review))
    }

    /// Update a review owned by the caller.
    ///
    /// Unsupplied fields retain their prior value. Fails with an
    /// authorization error whether the review is missing or owned by someone
    /// else; the two cases are not distinguished.
    async fn update_review(
        &self,
        ctx: &Context<'_>,
        review_id: ID,
        rating: Option<i32>,
        comment: Option<String>,
    ) -> Result<Review> {
        let review_id = parse_id(&review_id, "review id")?;

        let user_id = self.require_known_user(ctx, "update the review").await?;

        let patch = ReviewPatch { rating, comment };
        let updated = store(ctx)?
            .update_review_owned(ReviewId::new(review_id), user_id, patch)
            .await
            .map_err(db_err)?;

        updated.map(Review).ok_or_else(|| {
            ApiError::Unauthorized("you are not authorized to update the review".to_string())
                .extend()
        })
    }

    /// Delete a review owned by the caller, returning its prior state.
    async fn delete_review(&self, ctx: &Context<'_>, review_id: ID) -> Result<Review> {
        let review_id = parse_id(&review_id, "review id")?;

        let user_id = self.require_known_user(ctx, "delete the review").await?;

        let store = store(ctx)?;
        let deleted = store
            .delete_review_owned(ReviewId::new(review_id), user_id)
            .await
            .map_err(db_err)?;

        if let Some(review) = deleted {
            return Ok(Review(review));
        }

        // The scoped delete missed: report not-found for a missing review,
        // not-owner otherwise.
        let err = if store
            .review_by_id(ReviewId::new(review_id))
            .await
            .map_err(db_err)?
            .is_some()
        {
            ApiError::Unauthorized("you are not authorized to delete the review".to_string())
        } else {
            ApiError::ReviewNotFound
        };
        Err(err.extend())
    }
}

impl MutationRoot {
    /// Resolve the caller to an existing user row.
    ///
    /// A token whose subject no longer exists in the store is treated the
    /// same as no token at all.
    async fn require_known_user(&self, ctx: &Context<'_>, action: &str) -> Result<UserId> {
        let unauthorized =
            || ApiError::Unauthorized(format!("you are not authorized to {action}")).extend();

        let Some(user_id) = identity(ctx).user_id() else {
            return Err(unauthorized());
        };

        let known = store(ctx)?
            .user_by_id(user_id)
            .await
            .map_err(db_err)?
            .is_some();
        if !known {
            return Err(unauthorized());
        }
        Ok(user_id)
    }
}
