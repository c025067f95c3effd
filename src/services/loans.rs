//! Loan management service

use chrono::NaiveDate;

use super::today;
use crate::{
    error::{AppError, AppResult},
    models::{
        loan::{CreateLoan, LoanDetails, LoanQuery, LoanStatusFilter, LoanSummary, UpdateLoan},
        page::PageRequest,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

fn log_rejection(e: AppError) -> AppError {
    if let AppError::Conflict(ref msg) = e {
        tracing::warn!("Loan rejected: {}", msg);
    }
    e
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Search loans with optional student/book/status filters
    pub async fn search(&self, query: &LoanQuery, page: PageRequest) -> AppResult<(Vec<LoanDetails>, i64)> {
        self.repository.loans.search(query, today(), page).await
    }

    /// Loans not yet returned
    pub async fn list_active(&self, page: PageRequest) -> AppResult<(Vec<LoanDetails>, i64)> {
        let query = LoanQuery {
            status: Some(LoanStatusFilter::Active),
            ..Default::default()
        };
        self.repository.loans.search(&query, today(), page).await
    }

    /// Active loans due strictly before `as_of`
    pub async fn list_overdue(&self, as_of: Option<NaiveDate>, page: PageRequest) -> AppResult<(Vec<LoanDetails>, i64)> {
        let query = LoanQuery {
            status: Some(LoanStatusFilter::Overdue),
            ..Default::default()
        };
        self.repository
            .loans
            .search(&query, as_of.unwrap_or_else(today), page)
            .await
    }

    /// Loans of a student
    pub async fn student_loans(&self, student_id: i32, page: PageRequest) -> AppResult<(Vec<LoanDetails>, i64)> {
        // Verify student exists
        self.repository.students.get_by_id(student_id).await?;
        let query = LoanQuery {
            student_id: Some(student_id),
            ..Default::default()
        };
        self.repository.loans.search(&query, today(), page).await
    }

    /// Loans of a book
    pub async fn book_loans(&self, book_id: i32, page: PageRequest) -> AppResult<(Vec<LoanDetails>, i64)> {
        // Verify book exists
        self.repository.books.get_by_id(book_id).await?;
        let query = LoanQuery {
            book_id: Some(book_id),
            ..Default::default()
        };
        self.repository.loans.search(&query, today(), page).await
    }

    pub async fn get(&self, id: i32) -> AppResult<LoanDetails> {
        self.repository.loans.get_details(id, today()).await
    }

    /// Create a new loan (borrow a book)
    pub async fn create(&self, data: &CreateLoan) -> AppResult<LoanSummary> {
        data.check_dates()?;
        let loan = self.repository.loans.create(data).await.map_err(log_rejection)?;
        tracing::info!(
            "Loan {} opened: student {} borrowed book {}",
            loan.id,
            loan.student_id,
            loan.book_id
        );
        Ok(loan.summary(today()))
    }

    /// Apply a partial update
    pub async fn update(&self, id: i32, data: &UpdateLoan) -> AppResult<LoanSummary> {
        let loan = self.repository.loans.update(id, data).await.map_err(log_rejection)?;
        tracing::info!("Loan {} updated ({:?})", id, loan.status());
        Ok(loan.summary(today()))
    }

    /// Return a borrowed book
    pub async fn return_loan(&self, id: i32, returned_on: Option<NaiveDate>) -> AppResult<LoanSummary> {
        let today = today();
        let loan = self
            .repository
            .loans
            .mark_returned(id, returned_on.unwrap_or(today))
            .await
            .map_err(log_rejection)?;
        tracing::info!("Loan {} returned", id);
        Ok(loan.summary(today))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.loans.delete(id).await?;
        tracing::info!("Deleted loan {}", id);
        Ok(())
    }
}
