//! Book-Author edge set
//!
//! Each (book, author) pair is one row keyed by the pair itself, so both
//! directions are answered from the same table and duplicates are impossible.

use sqlx::{Pool, Postgres};

use super::{lock_reference, Entity};
use crate::{
    error::{AppError, AppResult},
    models::{author::Author, book::Book, book_author::BookAuthor, page::PageRequest},
};

#[derive(Clone)]
pub struct BookAuthorsRepository {
    pool: Pool<Postgres>,
}

impl BookAuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Add the edge; Conflict if it already exists
    pub async fn link(&self, book_id: i32, author_id: i32) -> AppResult<BookAuthor> {
        let mut tx = self.pool.begin().await?;
        lock_reference(&mut tx, Entity::Book, book_id).await?;
        lock_reference(&mut tx, Entity::Author, author_id).await?;

        let edge = sqlx::query_as::<_, BookAuthor>(
            r#"
            INSERT INTO book_authors (book_id, author_id)
            VALUES ($1, $2)
            ON CONFLICT (book_id, author_id) DO NOTHING
            RETURNING book_id, author_id
            "#,
        )
        .bind(book_id)
        .bind(author_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::Conflict(format!(
                "Author {} is already linked to book {}",
                author_id, book_id
            ))
        })?;

        tx.commit().await?;
        Ok(edge)
    }

    /// Remove the edge; NotFound if either side or the edge itself is missing
    pub async fn unlink(&self, book_id: i32, author_id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        lock_reference(&mut tx, Entity::Book, book_id).await?;
        lock_reference(&mut tx, Entity::Author, author_id).await?;

        let result = sqlx::query("DELETE FROM book_authors WHERE book_id = $1 AND author_id = $2")
            .bind(book_id)
            .bind(author_id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Author {} is not linked to book {}",
                author_id, book_id
            )));
        }

        tx.commit().await?;
        Ok(())
    }

    /// Authors of a book
    pub async fn authors_of_book(&self, book_id: i32) -> AppResult<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>(
            r#"
            SELECT a.*
            FROM authors a
            JOIN book_authors ba ON ba.author_id = a.id
            WHERE ba.book_id = $1
            ORDER BY a.name, a.id
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(authors)
    }

    /// Books of an author, paginated
    pub async fn books_of_author(&self, author_id: i32, page: PageRequest) -> AppResult<(Vec<Book>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_authors WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?;

        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT b.*
            FROM books b
            JOIN book_authors ba ON ba.book_id = b.id
            WHERE ba.author_id = $1
            ORDER BY b.title, b.id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(author_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((books, total))
    }
}
