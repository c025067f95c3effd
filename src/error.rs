//! Error types for the library server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sqlx::error::ErrorKind;
use thiserror::Error;

/// Machine-readable error codes carried in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    DbFailure = 3,
    NotFound = 4,
    Duplicate = 8,
    BadValue = 18,
    StillReferenced = 21,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NotFound, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, ErrorCode::Duplicate, msg.clone()),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        };

        let code = match (&self, code) {
            (AppError::Conflict(msg), _) if msg.starts_with(STILL_REFERENCED) => {
                ErrorCode::StillReferenced
            }
            (_, code) => code,
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

const STILL_REFERENCED: &str = "Still referenced";

/// Map a PostgreSQL constraint violation to the domain error it stands for.
///
/// Constraint names come from the schema in `migrations/`.
pub fn constraint_error(kind: ErrorKind, constraint: Option<&str>) -> Option<AppError> {
    match kind {
        ErrorKind::UniqueViolation => {
            let message = match constraint? {
                "students_registration_key" => "Registration number already in use",
                "students_email_key" => "Email already in use",
                "books_isbn_key" => "A book with this ISBN already exists",
                "book_authors_pkey" => "Author is already linked to this book",
                "loans_one_active_per_pair" => {
                    "An active loan already exists for this student and book"
                }
                _ => return None,
            };
            Some(AppError::Conflict(message.to_string()))
        }
        ErrorKind::ForeignKeyViolation => {
            let what = match constraint {
                Some("loans_student_id_fkey") => "student has loans",
                Some("loans_book_id_fkey") => "book has loans",
                _ => "record is used by another record",
            };
            Some(AppError::Conflict(format!("{}: {}", STILL_REFERENCED, what)))
        }
        _ => None,
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db) = err.as_database_error() {
            if let Some(mapped) = constraint_error(db.kind(), db.constraint()) {
                return mapped;
            }
        }
        AppError::Database(err)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Conflict("x".into()), StatusCode::CONFLICT),
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::Database(sqlx::Error::RowNotFound), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_unique_violations_become_conflicts() {
        for name in [
            "students_registration_key",
            "students_email_key",
            "books_isbn_key",
            "book_authors_pkey",
            "loans_one_active_per_pair",
        ] {
            let err = constraint_error(ErrorKind::UniqueViolation, Some(name));
            assert!(matches!(err, Some(AppError::Conflict(_))), "{name}");
        }
    }

    #[test]
    fn test_active_loan_violation_message() {
        match constraint_error(ErrorKind::UniqueViolation, Some("loans_one_active_per_pair")) {
            Some(AppError::Conflict(msg)) => assert!(msg.contains("active loan")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_unique_constraint_is_not_mapped() {
        assert!(constraint_error(ErrorKind::UniqueViolation, Some("other_key")).is_none());
        assert!(constraint_error(ErrorKind::UniqueViolation, None).is_none());
        assert!(constraint_error(ErrorKind::NotNullViolation, Some("students_email_key")).is_none());
    }

    #[test]
    fn test_foreign_key_violation_is_still_referenced() {
        let err = constraint_error(ErrorKind::ForeignKeyViolation, Some("loans_student_id_fkey"))
            .expect("mapped");
        match &err {
            AppError::Conflict(msg) => assert!(msg.contains("student has loans")),
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_row_not_found_stays_database_error() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::Database(_)));
    }
}
