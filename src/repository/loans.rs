//! Loans repository for database operations
//!
//! Writes run inside a transaction: referenced students/books are share-locked,
//! the loan being changed is row-locked, and the partial unique index
//! `loans_one_active_per_pair` settles any race the explicit check misses.

use chrono::NaiveDate;
use sqlx::{Pool, Postgres, QueryBuilder, Transaction};

use super::{lock_reference, Entity};
use crate::{
    error::{AppError, AppResult},
    models::{
        loan::{CreateLoan, Loan, LoanDetails, LoanDetailsRow, LoanQuery, LoanStatusFilter, UpdateLoan},
        page::PageRequest,
    },
};

const DETAILS_SELECT: &str = r#"
    SELECT l.id, l.loan_date, l.expected_return_date, l.actual_return_date,
           s.id AS student_id, s.name AS student_name,
           s.registration AS student_registration, s.course AS student_course,
           s.email AS student_email,
           b.id AS book_id, b.title AS book_title, b.year AS book_year,
           b.isbn AS book_isbn, b.category AS book_category
    FROM loans l
    JOIN students s ON s.id = l.student_id
    JOIN books b ON b.id = l.book_id
"#;

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &LoanQuery, today: NaiveDate) {
    builder.push(" WHERE TRUE");
    if let Some(student_id) = query.student_id {
        builder.push(" AND l.student_id = ").push_bind(student_id);
    }
    if let Some(book_id) = query.book_id {
        builder.push(" AND l.book_id = ").push_bind(book_id);
    }
    match query.status {
        Some(LoanStatusFilter::Active) => {
            builder.push(" AND l.actual_return_date IS NULL");
        }
        Some(LoanStatusFilter::Returned) => {
            builder.push(" AND l.actual_return_date IS NOT NULL");
        }
        Some(LoanStatusFilter::Overdue) => {
            builder
                .push(" AND l.actual_return_date IS NULL AND l.expected_return_date < ")
                .push_bind(today);
        }
        None => {}
    }
}

/// Id of another active loan for the pair, if any
async fn active_loan_for_pair(
    tx: &mut Transaction<'_, Postgres>,
    student_id: i32,
    book_id: i32,
    excluding: Option<i32>,
) -> AppResult<Option<i32>> {
    let id = sqlx::query_scalar::<_, i32>(
        r#"
        SELECT id FROM loans
        WHERE student_id = $1 AND book_id = $2
          AND actual_return_date IS NULL
          AND ($3::INTEGER IS NULL OR id <> $3)
        LIMIT 1
        "#,
    )
    .bind(student_id)
    .bind(book_id)
    .bind(excluding)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(id)
}

fn active_conflict(student_id: i32, book_id: i32, existing: i32) -> AppError {
    AppError::Conflict(format!(
        "Student {} already has an active loan (id {}) for book {}",
        student_id, existing, book_id
    ))
}

async fn lock_loan(tx: &mut Transaction<'_, Postgres>, id: i32) -> AppResult<Loan> {
    sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get loan with its student and book
    pub async fn get_details(&self, id: i32, today: NaiveDate) -> AppResult<LoanDetails> {
        let row = sqlx::query_as::<_, LoanDetailsRow>(&format!("{} WHERE l.id = $1", DETAILS_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))?;
        Ok(row.into_details(today))
    }

    /// Search loans; `today` is the reference date for overdue filtering and flags
    pub async fn search(
        &self,
        query: &LoanQuery,
        today: NaiveDate,
        page: PageRequest,
    ) -> AppResult<(Vec<LoanDetails>, i64)> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM loans l");
        push_filters(&mut count, query, today);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::new(DETAILS_SELECT);
        push_filters(&mut select, query, today);
        select
            .push(" ORDER BY l.loan_date, l.id LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        let rows = select
            .build_query_as::<LoanDetailsRow>()
            .fetch_all(&self.pool)
            .await?;

        let loans = rows.into_iter().map(|row| row.into_details(today)).collect();
        Ok((loans, total))
    }

    /// Create a new loan
    pub async fn create(&self, data: &CreateLoan) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        lock_reference(&mut tx, Entity::Student, data.student_id).await?;
        lock_reference(&mut tx, Entity::Book, data.book_id).await?;

        if let Some(existing) =
            active_loan_for_pair(&mut tx, data.student_id, data.book_id, None).await?
        {
            return Err(active_conflict(data.student_id, data.book_id, existing));
        }

        let loan = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (student_id, book_id, loan_date, expected_return_date, actual_return_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(data.student_id)
        .bind(data.book_id)
        .bind(data.loan_date)
        .bind(data.expected_return_date)
        .bind(data.actual_return_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(loan)
    }

    /// Apply a partial update to a loan
    pub async fn update(&self, id: i32, data: &UpdateLoan) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let mut loan = lock_loan(&mut tx, id).await?;

        if let Some(student_id) = data.student_id {
            lock_reference(&mut tx, Entity::Student, student_id).await?;
        }
        if let Some(book_id) = data.book_id {
            lock_reference(&mut tx, Entity::Book, book_id).await?;
        }

        loan.apply(data);
        loan.check_dates()?;

        if data.touches_pair() {
            let (student_id, book_id) = loan.pair();
            if let Some(existing) = active_loan_for_pair(&mut tx, student_id, book_id, Some(id)).await? {
                return Err(active_conflict(student_id, book_id, existing));
            }
        }

        let loan = sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans
            SET student_id = $2, book_id = $3, loan_date = $4,
                expected_return_date = $5, actual_return_date = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(loan.student_id)
        .bind(loan.book_id)
        .bind(loan.loan_date)
        .bind(loan.expected_return_date)
        .bind(loan.actual_return_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(loan)
    }

    /// Mark an active loan returned
    pub async fn mark_returned(&self, id: i32, returned_on: NaiveDate) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let mut loan = lock_loan(&mut tx, id).await?;
        if let Some(returned) = loan.actual_return_date {
            return Err(AppError::Conflict(format!(
                "Loan {} was already returned on {}",
                id, returned
            )));
        }

        loan.actual_return_date = Some(returned_on);
        loan.check_dates()?;

        let loan = sqlx::query_as::<_, Loan>(
            "UPDATE loans SET actual_return_date = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(returned_on)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(loan)
    }

    /// Delete a loan
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM loans WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Loan with id {} not found", id)));
        }
        Ok(())
    }
}
