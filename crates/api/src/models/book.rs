//! Book domain types.

use chrono::{DateTime, Utc};

use paperback_core::BookId;

/// A book in the catalogue.
///
/// Books carry no per-row ownership; any authenticated user may add one.
#[derive(Debug, Clone)]
pub struct Book {
    /// Unique book ID, assigned by the store.
    pub id: BookId,
    /// Book title.
    pub title: String,
    /// Author name.
    pub author: String,
    /// Year of publication.
    pub published_year: i32,
    /// When the book was added.
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a book.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub published_year: i32,
}
