//! Review domain types.

use chrono::{DateTime, Utc};

use paperback_core::{BookId, ReviewId, UserId};

/// A review of a book by a user.
///
/// The owning `user_id` is immutable after creation; only the owner may
/// update or delete the review.
#[derive(Debug, Clone)]
pub struct Review {
    /// Unique review ID, assigned by the store.
    pub id: ReviewId,
    /// User who wrote the review. Immutable.
    pub user_id: UserId,
    /// Book the review is about.
    pub book_id: BookId,
    /// Integer rating.
    pub rating: i32,
    /// Free-text comment.
    pub comment: String,
    /// When the review was posted.
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a review.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub user_id: UserId,
    pub book_id: BookId,
    pub rating: i32,
    pub comment: String,
}

/// Partial update for a review; `None` fields retain their prior value.
#[derive(Debug, Clone, Default)]
pub struct ReviewPatch {
    pub rating: Option<i32>,
    pub comment: Option<String>,
}
