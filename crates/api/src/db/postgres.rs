//! `PostgreSQL` implementation of the [`Store`] trait.
//!
//! Queries are runtime-checked (`query_as` with `FromRow` row types) so the
//! crate builds without a live database. Row values are parsed into domain
//! types on the way out; invalid stored data surfaces as
//! `RepositoryError::DataCorruption`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use paperback_core::{BookId, Email, ReviewId, UserId, Username};

use super::{RepositoryError, Store};
use crate::models::{Book, NewBook, NewReview, Page, Review, ReviewPatch, User};

/// `PostgreSQL`-backed store over a shared connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a new store over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    username: String,
    email: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, RepositoryError> {
        let username = Username::parse(&self.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        Ok(User {
            id: UserId::new(self.id),
            username,
            email,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    id: i32,
    title: String,
    author: String,
    published_year: i32,
    created_at: DateTime<Utc>,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            id: BookId::new(row.id),
            title: row.title,
            author: row.author,
            published_year: row.published_year,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: i32,
    user_id: i32,
    book_id: i32,
    rating: i32,
    comment: String,
    created_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: ReviewId::new(row.id),
            user_id: UserId::new(row.user_id),
            book_id: BookId::new(row.book_id),
            rating: row.rating,
            comment: row.comment,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(
        &self,
        username: &Username,
        email: &Email,
        password_digest: &str,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (username, email, password_digest)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, created_at
            ",
        )
        .bind(username.as_str())
        .bind(email.as_str())
        .bind(password_digest)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("username or email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.into_user()
    }

    async fn user_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, username, email, created_at
            FROM users
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn user_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct CredentialRow {
            #[sqlx(flatten)]
            user: UserRow,
            password_digest: String,
        }

        let row = sqlx::query_as::<_, CredentialRow>(
            r"
            SELECT id, username, email, created_at, password_digest
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some((r.user.into_user()?, r.password_digest))),
            None => Ok(None),
        }
    }

    async fn user_exists(
        &self,
        username: &Username,
        email: &Email,
    ) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE LOWER(username) = LOWER($1) OR LOWER(email) = LOWER($2)
            )
            ",
        )
        .bind(username.as_str())
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn create_book(&self, new: NewBook) -> Result<Book, RepositoryError> {
        let row = sqlx::query_as::<_, BookRow>(
            r"
            INSERT INTO books (title, author, published_year)
            VALUES ($1, $2, $3)
            RETURNING id, title, author, published_year, created_at
            ",
        )
        .bind(&new.title)
        .bind(&new.author)
        .bind(new.published_year)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn book_by_id(&self, id: BookId) -> Result<Option<Book>, RepositoryError> {
        let row = sqlx::query_as::<_, BookRow>(
            r"
            SELECT id, title, author, published_year, created_at
            FROM books
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_books(&self, page: Page) -> Result<Vec<Book>, RepositoryError> {
        // NULL limit/offset mean "unbounded" in PostgreSQL
        let rows = sqlx::query_as::<_, BookRow>(
            r"
            SELECT id, title, author, published_year, created_at
            FROM books
            ORDER BY id ASC
            OFFSET $1 LIMIT $2
            ",
        )
        .bind(page.skip)
        .bind(page.take)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn search_books(&self, query: &str) -> Result<Vec<Book>, RepositoryError> {
        let rows = sqlx::query_as::<_, BookRow>(
            r"
            SELECT id, title, author, published_year, created_at
            FROM books
            WHERE title ILIKE '%' || $1 || '%' OR author ILIKE '%' || $1 || '%'
            ORDER BY id ASC
            ",
        )
        .bind(query)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_review(&self, new: NewReview) -> Result<Review, RepositoryError> {
        let row = sqlx::query_as::<_, ReviewRow>(
            r"
            INSERT INTO reviews (user_id, book_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, book_id, rating, comment, created_at
            ",
        )
        .bind(new.user_id.as_i32())
        .bind(new.book_id.as_i32())
        .bind(new.rating)
        .bind(&new.comment)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn review_by_id(&self, id: ReviewId) -> Result<Option<Review>, RepositoryError> {
        let row = sqlx::query_as::<_, ReviewRow>(
            r"
            SELECT id, user_id, book_id, rating, comment, created_at
            FROM reviews
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn reviews_for_book(
        &self,
        book_id: BookId,
        page: Page,
    ) -> Result<Vec<Review>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            r"
            SELECT id, user_id, book_id, rating, comment, created_at
            FROM reviews
            WHERE book_id = $1
            ORDER BY id ASC
            OFFSET $2 LIMIT $3
            ",
        )
        .bind(book_id.as_i32())
        .bind(page.skip)
        .bind(page.take)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn reviews_by_user(
        &self,
        user_id: UserId,
        page: Page,
    ) -> Result<Vec<Review>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            r"
            SELECT id, user_id, book_id, rating, comment, created_at
            FROM reviews
            WHERE user_id = $1
            ORDER BY id ASC
            OFFSET $2 LIMIT $3
            ",
        )
        .bind(user_id.as_i32())
        .bind(page.skip)
        .bind(page.take)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_review_owned(
        &self,
        id: ReviewId,
        owner: UserId,
        patch: ReviewPatch,
    ) -> Result<Option<Review>, RepositoryError> {
        // Ownership check and write in one conditional statement; COALESCE
        // keeps unsupplied fields at their prior value.
        let row = sqlx::query_as::<_, ReviewRow>(
            r"
            UPDATE reviews
            SET rating = COALESCE($3, rating),
                comment = COALESCE($4, comment)
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, book_id, rating, comment, created_at
            ",
        )
        .bind(id.as_i32())
        .bind(owner.as_i32())
        .bind(patch.rating)
        .bind(patch.comment)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn delete_review_owned(
        &self,
        id: ReviewId,
        owner: UserId,
    ) -> Result<Option<Review>, RepositoryError> {
        let row = sqlx::query_as::<_, ReviewRow>(
            r"
            DELETE FROM reviews
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, book_id, rating, comment, created_at
            ",
        )
        .bind(id.as_i32())
        .bind(owner.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn reset(&self) -> Result<(), RepositoryError> {
        sqlx::query("TRUNCATE TABLE reviews, books, users RESTART IDENTITY CASCADE")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
