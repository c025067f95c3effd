//! Read-only aggregate queries

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::stats::StatsCounters};

#[derive(Clone)]
pub struct StatsRepository {
    pool: Pool<Postgres>,
}

impl StatsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Entity totals and loan counters as of `today`
    pub async fn counters(&self, today: NaiveDate) -> AppResult<StatsCounters> {
        let counters = sqlx::query_as::<_, StatsCounters>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM students) AS total_students,
                (SELECT COUNT(*) FROM authors) AS total_authors,
                (SELECT COUNT(*) FROM books) AS total_books,
                (SELECT COUNT(*) FROM loans) AS total_loans,
                (SELECT COUNT(*) FROM loans
                 WHERE actual_return_date IS NULL) AS active_loans,
                (SELECT COUNT(*) FROM loans
                 WHERE actual_return_date IS NULL
                   AND expected_return_date < $1) AS overdue_loans
            "#,
        )
        .bind(today)
        .fetch_one(&self.pool)
        .await?;
        Ok(counters)
    }

    /// Title of the most borrowed book. Ties resolve to the lowest id.
    pub async fn most_borrowed_book(&self) -> AppResult<Option<String>> {
        let title = sqlx::query_scalar::<_, String>(
            r#"
            SELECT b.title
            FROM loans l
            JOIN books b ON b.id = l.book_id
            GROUP BY b.id, b.title
            ORDER BY COUNT(*) DESC, b.id
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(title)
    }

    /// Name of the student with the most loans. Ties resolve to the lowest id.
    pub async fn most_active_student(&self) -> AppResult<Option<String>> {
        let name = sqlx::query_scalar::<_, String>(
            r#"
            SELECT s.name
            FROM loans l
            JOIN students s ON s.id = l.student_id
            GROUP BY s.id, s.name
            ORDER BY COUNT(*) DESC, s.id
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(name)
    }
}
