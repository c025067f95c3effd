//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, books, health, loans, stats, students};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library API",
        version = "1.0.0",
        description = "Library management REST API: students, authors, books and loans"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Students
        students::list_students,
        students::get_student,
        students::create_student,
        students::update_student,
        students::delete_student,
        students::list_student_loans,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        authors::list_author_books,
        authors::link_book,
        authors::unlink_book,
        // Books
        books::list_books,
        books::search_books,
        books::most_borrowed_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        books::list_book_authors,
        books::link_author,
        books::unlink_author,
        books::list_book_loans,
        // Loans
        loans::list_loans,
        loans::list_active_loans,
        loans::list_overdue_loans,
        loans::get_loan,
        loans::create_loan,
        loans::update_loan,
        loans::return_loan,
        loans::delete_loan,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            // Students
            crate::models::student::Student,
            crate::models::student::CreateStudent,
            crate::models::student::UpdateStudent,
            // Authors
            crate::models::author::Author,
            crate::models::author::CreateAuthor,
            crate::models::author::UpdateAuthor,
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::book::BookLoanStats,
            crate::models::book_author::BookAuthor,
            // Loans
            crate::models::loan::LoanStatus,
            crate::models::loan::LoanStatusFilter,
            crate::models::loan::LoanSummary,
            crate::models::loan::LoanDetails,
            crate::models::loan::CreateLoan,
            crate::models::loan::UpdateLoan,
            crate::models::loan::ReturnLoan,
            // Stats
            crate::models::stats::LibraryStats,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "students", description = "Student management"),
        (name = "authors", description = "Author management and book links"),
        (name = "books", description = "Book catalog, search and author links"),
        (name = "loans", description = "Loan lifecycle"),
        (name = "stats", description = "Statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
