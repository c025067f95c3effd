//! Loan model and lifecycle rules
//!
//! A loan is *active* while `actual_return_date` is null and *returned* once it
//! is set. The transition is one-way: updates may set or correct the return
//! date but never clear it. Overdue is derived at read time and never stored.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::{book::Book, student::Student};
use crate::error::{AppError, AppResult};

/// Loan model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Loan {
    pub id: i32,
    pub student_id: i32,
    pub book_id: i32,
    pub loan_date: NaiveDate,
    pub expected_return_date: NaiveDate,
    pub actual_return_date: Option<NaiveDate>,
}

/// Lifecycle state of a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Active,
    Returned,
}

impl Loan {
    pub fn status(&self) -> LoanStatus {
        match self.actual_return_date {
            None => LoanStatus::Active,
            Some(_) => LoanStatus::Returned,
        }
    }

    pub fn is_active(&self) -> bool {
        self.actual_return_date.is_none()
    }

    /// Active and expected back strictly before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.is_active() && self.expected_return_date < today
    }

    /// The (student, book) pair the active-loan rule is keyed on
    pub fn pair(&self) -> (i32, i32) {
        (self.student_id, self.book_id)
    }

    /// Apply the fields present in `changes`.
    pub fn apply(&mut self, changes: &UpdateLoan) {
        if let Some(student_id) = changes.student_id {
            self.student_id = student_id;
        }
        if let Some(book_id) = changes.book_id {
            self.book_id = book_id;
        }
        if let Some(loan_date) = changes.loan_date {
            self.loan_date = loan_date;
        }
        if let Some(expected) = changes.expected_return_date {
            self.expected_return_date = expected;
        }
        if let Some(returned) = changes.actual_return_date {
            self.actual_return_date = Some(returned);
        }
    }

    pub fn check_dates(&self) -> AppResult<()> {
        check_loan_dates(self.loan_date, self.expected_return_date, self.actual_return_date)
    }

    pub fn summary(self, today: NaiveDate) -> LoanSummary {
        LoanSummary {
            status: self.status(),
            is_overdue: self.is_overdue(today),
            id: self.id,
            student_id: self.student_id,
            book_id: self.book_id,
            loan_date: self.loan_date,
            expected_return_date: self.expected_return_date,
            actual_return_date: self.actual_return_date,
        }
    }
}

/// Neither the expected nor the actual return may precede the loan itself.
pub fn check_loan_dates(
    loan_date: NaiveDate,
    expected_return_date: NaiveDate,
    actual_return_date: Option<NaiveDate>,
) -> AppResult<()> {
    if expected_return_date < loan_date {
        return Err(AppError::Validation(
            "expected_return_date must not be before loan_date".to_string(),
        ));
    }
    if actual_return_date.is_some_and(|returned| returned < loan_date) {
        return Err(AppError::Validation(
            "actual_return_date must not be before loan_date".to_string(),
        ));
    }
    Ok(())
}

/// Loan as returned by create/update endpoints
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanSummary {
    pub id: i32,
    pub student_id: i32,
    pub book_id: i32,
    pub loan_date: NaiveDate,
    pub expected_return_date: NaiveDate,
    pub actual_return_date: Option<NaiveDate>,
    pub status: LoanStatus,
    pub is_overdue: bool,
}

/// Loan with its student and book resolved
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanDetails {
    pub id: i32,
    pub loan_date: NaiveDate,
    pub expected_return_date: NaiveDate,
    pub actual_return_date: Option<NaiveDate>,
    pub status: LoanStatus,
    pub is_overdue: bool,
    pub student: Student,
    pub book: Book,
}

/// Flat row produced by the loan/student/book join
#[derive(Debug, FromRow)]
pub struct LoanDetailsRow {
    pub id: i32,
    pub loan_date: NaiveDate,
    pub expected_return_date: NaiveDate,
    pub actual_return_date: Option<NaiveDate>,
    pub student_id: i32,
    pub student_name: String,
    pub student_registration: String,
    pub student_course: String,
    pub student_email: String,
    pub book_id: i32,
    pub book_title: String,
    pub book_year: i32,
    pub book_isbn: String,
    pub book_category: Option<String>,
}

impl LoanDetailsRow {
    pub fn into_details(self, today: NaiveDate) -> LoanDetails {
        let loan = Loan {
            id: self.id,
            student_id: self.student_id,
            book_id: self.book_id,
            loan_date: self.loan_date,
            expected_return_date: self.expected_return_date,
            actual_return_date: self.actual_return_date,
        };
        LoanDetails {
            id: loan.id,
            loan_date: loan.loan_date,
            expected_return_date: loan.expected_return_date,
            actual_return_date: loan.actual_return_date,
            status: loan.status(),
            is_overdue: loan.is_overdue(today),
            student: Student {
                id: self.student_id,
                name: self.student_name,
                registration: self.student_registration,
                course: self.student_course,
                email: self.student_email,
            },
            book: Book {
                id: self.book_id,
                title: self.book_title,
                year: self.book_year,
                isbn: self.book_isbn,
                category: self.book_category,
            },
        }
    }
}

/// Create loan request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateLoan {
    pub student_id: i32,
    pub book_id: i32,
    pub loan_date: NaiveDate,
    pub expected_return_date: NaiveDate,
    /// Leave empty to open an active loan
    pub actual_return_date: Option<NaiveDate>,
}

impl CreateLoan {
    pub fn check_dates(&self) -> AppResult<()> {
        check_loan_dates(self.loan_date, self.expected_return_date, self.actual_return_date)
    }
}

/// Update loan request; omitted fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateLoan {
    pub student_id: Option<i32>,
    pub book_id: Option<i32>,
    pub loan_date: Option<NaiveDate>,
    pub expected_return_date: Option<NaiveDate>,
    /// Setting this marks the loan returned; it cannot be cleared again
    pub actual_return_date: Option<NaiveDate>,
}

impl UpdateLoan {
    /// Whether the update moves the loan to another student or book
    pub fn touches_pair(&self) -> bool {
        self.student_id.is_some() || self.book_id.is_some()
    }
}

/// Return request body
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ReturnLoan {
    /// Defaults to today
    pub returned_on: Option<NaiveDate>,
}

/// Status filter for loan listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatusFilter {
    Active,
    Returned,
    Overdue,
}

/// Loan query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct LoanQuery {
    pub student_id: Option<i32>,
    pub book_id: Option<i32>,
    /// active, returned or overdue
    pub status: Option<LoanStatusFilter>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Overdue listing parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct OverdueQuery {
    /// Reference date (defaults to today)
    pub as_of: Option<NaiveDate>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
