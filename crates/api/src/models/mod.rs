//! Domain models for the book-review platform.
//!
//! These types represent validated domain objects separate from database row
//! types and from the GraphQL object types that wrap them.

pub mod book;
pub mod review;
pub mod user;

pub use book::{Book, NewBook};
pub use review::{NewReview, Review, ReviewPatch};
pub use user::User;

/// An offset/limit window over a listing.
///
/// Both bounds are optional; an absent bound means "from the start" /
/// "to the end". Cursor correctness beyond offset/limit is out of scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    /// Rows to skip from the start of the listing.
    pub skip: Option<i64>,
    /// Maximum number of rows to return.
    pub take: Option<i64>,
}

impl Page {
    /// Build a page from wire-format (32-bit) arguments.
    #[must_use]
    pub fn new(skip: Option<i32>, take: Option<i32>) -> Self {
        Self {
            skip: skip.map(i64::from),
            take: take.map(i64::from),
        }
    }

    /// Apply this window to an iterator (in-memory store path).
    pub fn apply<I: Iterator>(self, iter: I) -> impl Iterator<Item = I::Item> {
        let skip = usize::try_from(self.skip.unwrap_or(0).max(0)).unwrap_or(0);
        let take = self
            .take
            .and_then(|t| usize::try_from(t.max(0)).ok())
            .unwrap_or(usize::MAX);
        iter.skip(skip).take(take)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_apply_defaults_to_everything() {
        let all: Vec<i32> = Page::default().apply(1..=5).collect();
        assert_eq!(all, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_page_apply_skip_and_take() {
        let window: Vec<i32> = Page::new(Some(1), Some(2)).apply(1..=5).collect();
        assert_eq!(window, vec![2, 3]);
    }

    #[test]
    fn test_page_apply_negative_bounds_are_ignored() {
        let window: Vec<i32> = Page::new(Some(-3), Some(-1)).apply(1..=5).collect();
        assert!(window.is_empty());

        let window: Vec<i32> = Page::new(Some(-3), None).apply(1..=3).collect();
        assert_eq!(window, vec![1, 2, 3]);
    }
}
