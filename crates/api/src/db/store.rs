//! The persistence collaborator seam.

use async_trait::async_trait;

use paperback_core::{BookId, Email, ReviewId, UserId, Username};

use super::RepositoryError;
use crate::models::{Book, NewBook, NewReview, Page, Review, ReviewPatch, User};

/// Relational store operations required by the resolver layer.
///
/// One method per query shape; every method is a single statement against the
/// store. Ownership-scoped review mutations are conditional on both the
/// review id and the owning user id, so the ownership check and the write
/// happen atomically in one statement.
#[async_trait]
pub trait Store: Send + Sync {
    // =========================================================================
    // Users
    // =========================================================================

    /// Create a user with a pre-computed password digest.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username or email is
    /// already taken (case-insensitively).
    async fn create_user(
        &self,
        username: &Username,
        email: &Email,
        password_digest: &str,
    ) -> Result<User, RepositoryError>;

    /// Get a user by ID.
    async fn user_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Get a user and their password digest by email.
    ///
    /// Returns `None` if no user has that email.
    async fn user_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError>;

    /// Whether a user with the given username OR email already exists,
    /// compared case-insensitively.
    async fn user_exists(
        &self,
        username: &Username,
        email: &Email,
    ) -> Result<bool, RepositoryError>;

    // =========================================================================
    // Books
    // =========================================================================

    /// Add a book to the catalogue.
    async fn create_book(&self, new: NewBook) -> Result<Book, RepositoryError>;

    /// Get a book by ID.
    async fn book_by_id(&self, id: BookId) -> Result<Option<Book>, RepositoryError>;

    /// List books in insertion order.
    async fn list_books(&self, page: Page) -> Result<Vec<Book>, RepositoryError>;

    /// Books whose title or author contains `query`, case-insensitively.
    async fn search_books(&self, query: &str) -> Result<Vec<Book>, RepositoryError>;

    // =========================================================================
    // Reviews
    // =========================================================================

    /// Create a review owned by `new.user_id`.
    async fn create_review(&self, new: NewReview) -> Result<Review, RepositoryError>;

    /// Get a review by ID.
    async fn review_by_id(&self, id: ReviewId) -> Result<Option<Review>, RepositoryError>;

    /// Reviews for a book, oldest first.
    async fn reviews_for_book(
        &self,
        book_id: BookId,
        page: Page,
    ) -> Result<Vec<Review>, RepositoryError>;

    /// Reviews written by a user, oldest first.
    async fn reviews_by_user(
        &self,
        user_id: UserId,
        page: Page,
    ) -> Result<Vec<Review>, RepositoryError>;

    /// Apply a partial update to a review, conditional on `owner` matching
    /// the review's owning user. Unset patch fields retain their prior value.
    ///
    /// Returns `None` when no row matched, either because the review does
    /// not exist or because it is owned by someone else.
    async fn update_review_owned(
        &self,
        id: ReviewId,
        owner: UserId,
        patch: ReviewPatch,
    ) -> Result<Option<Review>, RepositoryError>;

    /// Delete a review, conditional on `owner` matching the review's owning
    /// user. Returns the deleted review's prior state, or `None` when no row
    /// matched.
    async fn delete_review_owned(
        &self,
        id: ReviewId,
        owner: UserId,
    ) -> Result<Option<Review>, RepositoryError>;

    // =========================================================================
    // Test setup
    // =========================================================================

    /// Delete all rows and reset ID sequences. Test setup only.
    async fn reset(&self) -> Result<(), RepositoryError>;
}
