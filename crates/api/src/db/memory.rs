//! In-memory implementation of the [`Store`] trait for tests.
//!
//! Semantics mirror `PgStore`: serial IDs starting at 1, case-insensitive
//! uniqueness for usernames and emails, case-insensitive substring search,
//! and owner-scoped review mutations that match zero rows rather than erring.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use paperback_core::{BookId, Email, ReviewId, UserId, Username};

use super::{RepositoryError, Store};
use crate::models::{Book, NewBook, NewReview, Page, Review, ReviewPatch, User};

struct StoredUser {
    user: User,
    password_digest: String,
}

#[derive(Default)]
struct Inner {
    users: Vec<StoredUser>,
    books: Vec<Book>,
    reviews: Vec<Review>,
    next_user_id: i32,
    next_book_id: i32,
    next_review_id: i32,
}

/// In-memory store for integration tests.
#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
}

impl MemStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of user rows. Test assertions only.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.lock().users.len()
    }

    /// Number of review rows. Test assertions only.
    #[must_use]
    pub fn review_count(&self) -> usize {
        self.lock().reviews.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl Store for MemStore {
    async fn create_user(
        &self,
        username: &Username,
        email: &Email,
        password_digest: &str,
    ) -> Result<User, RepositoryError> {
        let mut inner = self.lock();

        let taken = inner.users.iter().any(|u| {
            u.user.username.normalized() == username.normalized()
                || u.user.email.normalized() == email.normalized()
        });
        if taken {
            return Err(RepositoryError::Conflict(
                "username or email already exists".to_owned(),
            ));
        }

        inner.next_user_id += 1;
        let user = User {
            id: UserId::new(inner.next_user_id),
            username: username.clone(),
            email: email.clone(),
            created_at: Utc::now(),
        };
        inner.users.push(StoredUser {
            user: user.clone(),
            password_digest: password_digest.to_owned(),
        });

        Ok(user)
    }

    async fn user_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| u.user.id == id)
            .map(|u| u.user.clone()))
    }

    async fn user_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| u.user.email == *email)
            .map(|u| (u.user.clone(), u.password_digest.clone())))
    }

    async fn user_exists(
        &self,
        username: &Username,
        email: &Email,
    ) -> Result<bool, RepositoryError> {
        Ok(self.lock().users.iter().any(|u| {
            u.user.username.normalized() == username.normalized()
                || u.user.email.normalized() == email.normalized()
        }))
    }

    async fn create_book(&self, new: NewBook) -> Result<Book, RepositoryError> {
        let mut inner = self.lock();
        inner.next_book_id += 1;
        let book = Book {
            id: BookId::new(inner.next_book_id),
            title: new.title,
            author: new.author,
            published_year: new.published_year,
            created_at: Utc::now(),
        };
        inner.books.push(book.clone());
        Ok(book)
    }

    async fn book_by_id(&self, id: BookId) -> Result<Option<Book>, RepositoryError> {
        Ok(self.lock().books.iter().find(|b| b.id == id).cloned())
    }

    async fn list_books(&self, page: Page) -> Result<Vec<Book>, RepositoryError> {
        Ok(page.apply(self.lock().books.iter().cloned()).collect())
    }

    async fn search_books(&self, query: &str) -> Result<Vec<Book>, RepositoryError> {
        Ok(self
            .lock()
            .books
            .iter()
            .filter(|b| contains_ci(&b.title, query) || contains_ci(&b.author, query))
            .cloned()
            .collect())
    }

    async fn create_review(&self, new: NewReview) -> Result<Review, RepositoryError> {
        let mut inner = self.lock();
        inner.next_review_id += 1;
        let review = Review {
            id: ReviewId::new(inner.next_review_id),
            user_id: new.user_id,
            book_id: new.book_id,
            rating: new.rating,
            comment: new.comment,
            created_at: Utc::now(),
        };
        inner.reviews.push(review.clone());
        Ok(review)
    }

    async fn review_by_id(&self, id: ReviewId) -> Result<Option<Review>, RepositoryError> {
        Ok(self.lock().reviews.iter().find(|r| r.id == id).cloned())
    }

    async fn reviews_for_book(
        &self,
        book_id: BookId,
        page: Page,
    ) -> Result<Vec<Review>, RepositoryError> {
        Ok(page
            .apply(
                self.lock()
                    .reviews
                    .iter()
                    .filter(|r| r.book_id == book_id)
                    .cloned(),
            )
            .collect())
    }

    async fn reviews_by_user(
        &self,
        user_id: UserId,
        page: Page,
    ) -> Result<Vec<Review>, RepositoryError> {
        Ok(page
            .apply(
                self.lock()
                    .reviews
                    .iter()
                    .filter(|r| r.user_id == user_id)
                    .cloned(),
            )
            .collect())
    }

    async fn update_review_owned(
        &self,
        id: ReviewId,
        owner: UserId,
        patch: ReviewPatch,
    ) -> Result<Option<Review>, RepositoryError> {
        let mut inner = self.lock();
        let Some(review) = inner
            .reviews
            .iter_mut()
            .find(|r| r.id == id && r.user_id == owner)
        else {
            return Ok(None);
        };

        if let Some(rating) = patch.rating {
            review.rating = rating;
        }
        if let Some(comment) = patch.comment {
            review.comment = comment;
        }

        Ok(Some(review.clone()))
    }

    async fn delete_review_owned(
        &self,
        id: ReviewId,
        owner: UserId,
    ) -> Result<Option<Review>, RepositoryError> {
        let mut inner = self.lock();
        let Some(pos) = inner
            .reviews
            .iter()
            .position(|r| r.id == id && r.user_id == owner)
        else {
            return Ok(None);
        };

        Ok(Some(inner.reviews.remove(pos)))
    }

    async fn reset(&self) -> Result<(), RepositoryError> {
        let mut inner = self.lock();
        *inner = Inner::default();
        Ok(())
    }
}
