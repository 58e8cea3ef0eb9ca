//! Query resolvers.

use async_graphql::{Context, ErrorExtensions, ID, Object, Result};

use paperback_core::BookId;

use super::types::{Book, Review};
use super::{db_err, identity, parse_id, store};
use crate::error::ApiError;
use crate::models::Page;

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// A page of books in insertion order.
    async fn get_books(
        &self,
        ctx: &Context<'_>,
        skip: Option<i32>,
        take: Option<i32>,
    ) -> Result<Vec<Book>> {
        let books = store(ctx)?
            .list_books(Page::new(skip, take))
            .await
            .map_err(db_err)?;
        Ok(books.into_iter().map(Book).collect())
    }

    /// A single book, or null if no book has that id.
    async fn get_book(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Book>> {
        let id = parse_id(&id, "book id")?;
        let book = store(ctx)?
            .book_by_id(BookId::new(id))
            .await
            .map_err(db_err)?;
        Ok(book.map(Book))
    }

    /// Reviews for a book, oldest first.
    async fn get_reviews(
        &self,
        ctx: &Context<'_>,
        book_id: ID,
        skip: Option<i32>,
        take: Option<i32>,
    ) -> Result<Vec<Review>> {
        let book_id = parse_id(&book_id, "book id")?;
        let reviews = store(ctx)?
            .reviews_for_book(BookId::new(book_id), Page::new(skip, take))
            .await
            .map_err(db_err)?;
        Ok(reviews.into_iter().map(Review).collect())
    }

    /// Reviews written by the authenticated caller, oldest first.
    async fn get_my_reviews(
        &self,
        ctx: &Context<'_>,
        skip: Option<i32>,
        take: Option<i32>,
    ) -> Result<Vec<Review>> {
        let Some(user_id) = identity(ctx).user_id() else {
            return Err(ApiError::Unauthorized(
                "you are not authorized to view the reviews".to_string(),
            )
            .extend());
        };

        let reviews = store(ctx)?
            .reviews_by_user(user_id, Page::new(skip, take))
            .await
            .map_err(db_err)?;
        Ok(reviews.into_iter().map(Review).collect())
    }

    /// Books whose title or author contains `query`, case-insensitively.
    async fn search_books(&self, ctx: &Context<'_>, query: String) -> Result<Vec<Book>> {
        let books = store(ctx)?
            .search_books(&query)
            .await
            .map_err(db_err)?;
        Ok(books.into_iter().map(Book).collect())
    }
}
