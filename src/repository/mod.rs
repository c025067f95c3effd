//! Repository layer for database operations

pub mod authors;
pub mod book_authors;
pub mod books;
pub mod loans;
pub mod stats;
pub mod students;

use sqlx::{Pool, Postgres, Transaction};

use crate::error::{AppError, AppResult};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub students: students::StudentsRepository,
    pub authors: authors::AuthorsRepository,
    pub books: books::BooksRepository,
    pub book_authors: book_authors::BookAuthorsRepository,
    pub loans: loans::LoansRepository,
    pub stats: stats::StatsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            students: students::StudentsRepository::new(pool.clone()),
            authors: authors::AuthorsRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            book_authors: book_authors::BookAuthorsRepository::new(pool.clone()),
            loans: loans::LoansRepository::new(pool.clone()),
            stats: stats::StatsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round-trip to the database, used by the readiness probe
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Top-level entities that other records point at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Student,
    Author,
    Book,
}

impl Entity {
    fn table(self) -> &'static str {
        match self {
            Entity::Student => "students",
            Entity::Author => "authors",
            Entity::Book => "books",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Entity::Student => "Student",
            Entity::Author => "Author",
            Entity::Book => "Book",
        }
    }

    pub fn not_found(self, id: i32) -> AppError {
        AppError::NotFound(format!("{} with id {} not found", self.label(), id))
    }
}

/// Resolve a referenced row and hold a share lock on it until the transaction ends,
/// so it cannot be deleted while a loan or edge pointing at it is written.
pub(crate) async fn lock_reference(
    tx: &mut Transaction<'_, Postgres>,
    entity: Entity,
    id: i32,
) -> AppResult<()> {
    let query = format!("SELECT id FROM {} WHERE id = $1 FOR SHARE", entity.table());
    sqlx::query_scalar::<_, i32>(&query)
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?
        .map(|_| ())
        .ok_or_else(|| entity.not_found(id))
}

/// `%term%` for ILIKE, with the pattern metacharacters escaped
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
