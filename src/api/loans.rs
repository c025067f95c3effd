//! Loan management endpoints

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::{
        loan::{CreateLoan, LoanDetails, LoanQuery, LoanSummary, OverdueQuery, ReturnLoan, UpdateLoan},
        page::{PageParams, PaginatedResponse},
    },
    AppState,
};

use super::page_request;

/// List loans, optionally filtered by student, book or status
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    params(LoanQuery),
    responses(
        (status = 200, description = "List of loans", body = PaginatedResponse<LoanDetails>)
    )
)]
pub async fn list_loans(
    State(state): State<AppState>,
    Query(query): Query<LoanQuery>,
) -> AppResult<Json<PaginatedResponse<LoanDetails>>> {
    let page = page_request(&state, query.page, query.per_page);
    let (loans, total) = state.services.loans.search(&query, page).await?;
    Ok(Json(PaginatedResponse::new(loans, total, page)))
}

/// Loans that have not been returned
#[utoipa::path(
    get,
    path = "/loans/active",
    tag = "loans",
    params(PageParams),
    responses(
        (status = 200, description = "Active loans", body = PaginatedResponse<LoanDetails>)
    )
)]
pub async fn list_active_loans(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<PaginatedResponse<LoanDetails>>> {
    let page = page_request(&state, params.page, params.per_page);
    let (loans, total) = state.services.loans.list_active(page).await?;
    Ok(Json(PaginatedResponse::new(loans, total, page)))
}

/// Active loans past their expected return date
#[utoipa::path(
    get,
    path = "/loans/overdue",
    tag = "loans",
    params(OverdueQuery),
    responses(
        (status = 200, description = "Overdue loans", body = PaginatedResponse<LoanDetails>)
    )
)]
pub async fn list_overdue_loans(
    State(state): State<AppState>,
    Query(query): Query<OverdueQuery>,
) -> AppResult<Json<PaginatedResponse<LoanDetails>>> {
    let page = page_request(&state, query.page, query.per_page);
    let (loans, total) = state.services.loans.list_overdue(query.as_of, page).await?;
    Ok(Json(PaginatedResponse::new(loans, total, page)))
}

/// Get loan with its student and book
#[utoipa::path(
    get,
    path = "/loans/{id}",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Loan details", body = LoanDetails),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn get_loan(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Json<LoanDetails>> {
    let loan = state.services.loans.get(id).await?;
    Ok(Json(loan))
}

/// Create a new loan (borrow a book)
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = CreateLoan,
    responses(
        (status = 201, description = "Loan created", body = LoanSummary),
        (status = 400, description = "Invalid dates"),
        (status = 404, description = "Student or book not found"),
        (status = 409, description = "Student already has this book on loan")
    )
)]
pub async fn create_loan(
    State(state): State<AppState>,
    Json(loan): Json<CreateLoan>,
) -> AppResult<(StatusCode, Json<LoanSummary>)> {
    let created = state.services.loans.create(&loan).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Partially update a loan
#[utoipa::path(
    put,
    path = "/loans/{id}",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    request_body = UpdateLoan,
    responses(
        (status = 200, description = "Loan updated", body = LoanSummary),
        (status = 400, description = "Invalid dates"),
        (status = 404, description = "Loan, student or book not found"),
        (status = 409, description = "Another active loan exists for the pair")
    )
)]
pub async fn update_loan(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(loan): Json<UpdateLoan>,
) -> AppResult<Json<LoanSummary>> {
    let updated = state.services.loans.update(id, &loan).await?;
    Ok(Json(updated))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/loans/{id}/return",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    request_body(content = ReturnLoan, description = "Optional return date, defaults to today"),
    responses(
        (status = 200, description = "Book returned", body = LoanSummary),
        (status = 400, description = "Malformed body or return date before loan date"),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn return_loan(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    body: Bytes,
) -> AppResult<Json<LoanSummary>> {
    let returned_on = parse_return_body(&body)?.returned_on;
    let loan = state.services.loans.return_loan(id, returned_on).await?;
    Ok(Json(loan))
}

/// An empty body means "today"; anything else must be a valid `ReturnLoan`
fn parse_return_body(body: &[u8]) -> AppResult<ReturnLoan> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ReturnLoan::default());
    }
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("Invalid return body: {}", e)))
}

/// Delete a loan record
#[utoipa::path(
    delete,
    path = "/loans/{id}",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 204, description = "Loan deleted"),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn delete_loan(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    state.services.loans.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
