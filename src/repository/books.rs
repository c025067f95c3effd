//! Books repository for database operations

use sqlx::{Pool, Postgres, QueryBuilder};

use super::{contains_pattern, Entity};
use crate::{
    error::AppResult,
    models::{
        book::{Book, BookLoanStats, BookQuery, CreateBook, UpdateBook},
        page::PageRequest,
    },
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &BookQuery) {
    builder.push(" WHERE TRUE");
    if let Some(title) = query.title.as_deref().filter(|s| !s.trim().is_empty()) {
        builder.push(" AND title ILIKE ").push_bind(contains_pattern(title));
    }
    if let Some(category) = query.category.as_deref().filter(|s| !s.trim().is_empty()) {
        builder.push(" AND category ILIKE ").push_bind(contains_pattern(category));
    }
}

// Matches title, category, or the name of any linked author
const TEXT_SEARCH_WHERE: &str = r#"
    WHERE b.title ILIKE $1
       OR b.category ILIKE $1
       OR EXISTS (
           SELECT 1 FROM book_authors ba
           JOIN authors a ON a.id = ba.author_id
           WHERE ba.book_id = b.id AND a.name ILIKE $1
       )
"#;

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Entity::Book.not_found(id))
    }

    pub async fn search(&self, query: &BookQuery, page: PageRequest) -> AppResult<(Vec<Book>, i64)> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM books");
        push_filters(&mut count, query);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::new("SELECT * FROM books");
        push_filters(&mut select, query);
        select
            .push(" ORDER BY title, id LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        let books = select.build_query_as::<Book>().fetch_all(&self.pool).await?;

        Ok((books, total))
    }

    /// Free-text search over title, category and author names
    pub async fn search_text(&self, term: &str, page: PageRequest) -> AppResult<(Vec<Book>, i64)> {
        let pattern = contains_pattern(term);

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM books b {}",
            TEXT_SEARCH_WHERE
        ))
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT b.* FROM books b {} ORDER BY b.title, b.id LIMIT $2 OFFSET $3",
            TEXT_SEARCH_WHERE
        ))
        .bind(&pattern)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((books, total))
    }

    pub async fn create(&self, data: &CreateBook) -> AppResult<Book> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, year, isbn, category)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(data.year)
        .bind(&data.isbn)
        .bind(&data.category)
        .fetch_one(&self.pool)
        .await?;
        Ok(book)
    }

    pub async fn update(&self, id: i32, data: &UpdateBook) -> AppResult<Book> {
        if data.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut builder = QueryBuilder::<Postgres>::new("UPDATE books SET ");
        let mut sets = builder.separated(", ");
        if let Some(ref title) = data.title {
            sets.push("title = ").push_bind_unseparated(title);
        }
        if let Some(year) = data.year {
            sets.push("year = ").push_bind_unseparated(year);
        }
        if let Some(ref isbn) = data.isbn {
            sets.push("isbn = ").push_bind_unseparated(isbn);
        }
        if let Some(ref category) = data.category {
            sets.push("category = ").push_bind_unseparated(category);
        }
        builder.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        builder
            .build_query_as::<Book>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Entity::Book.not_found(id))
    }

    /// Delete a book; fails while loans still reference it, author links are dropped
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Entity::Book.not_found(id));
        }
        Ok(())
    }

    /// Books ranked by how often they were borrowed
    pub async fn most_borrowed(&self, limit: i64) -> AppResult<Vec<BookLoanStats>> {
        let rows = sqlx::query_as::<_, BookLoanStats>(
            r#"
            SELECT b.id, b.title, b.year, b.isbn, b.category,
                   COUNT(l.id) AS total_loans,
                   COUNT(l.id) FILTER (WHERE l.actual_return_date IS NULL) AS active_loans
            FROM books b
            JOIN loans l ON l.book_id = b.id
            GROUP BY b.id
            ORDER BY total_loans DESC, b.id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
